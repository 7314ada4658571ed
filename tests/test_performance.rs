//! Performance tests for the generation systems

use seedforge::{
    EntityGenerator, ForgeResult, GenerationParams, Generator, GenreBlender, GenreRegistry,
    ItemGenerator, MerchantGenerator,
};
use std::sync::Arc;
use std::time::Instant;

#[test]
fn test_item_generation_performance() -> ForgeResult<()> {
    let generator = ItemGenerator::new(Arc::new(GenreRegistry::with_base_genres()));
    let params = GenerationParams::new(25, 0.5, "fantasy").with_count(1_000);

    let start = Instant::now();
    let iterations = 10;
    for seed in 0..iterations {
        let items = generator.generate(seed, &params)?;
        assert_eq!(items.len(), 1_000);
    }

    let elapsed = start.elapsed();
    let avg_batch_time = elapsed / iterations as u32;

    println!("Average time per 1000 items: {:?}", avg_batch_time);

    // Unoptimized debug builds still have to stay well under half a second
    assert!(
        avg_batch_time.as_millis() < 500,
        "Item generation too slow: {:?}",
        avg_batch_time
    );

    Ok(())
}

#[test]
fn test_merchant_generation_performance() -> ForgeResult<()> {
    let generator = MerchantGenerator::new(Arc::new(GenreRegistry::with_base_genres()));
    let params = GenerationParams::new(40, 0.7, "cyberpunk").with_count(50);

    let start = Instant::now();
    let merchants = generator.generate(12345, &params)?;
    generator.validate(&merchants, &params)?;
    let elapsed = start.elapsed();

    println!("50 merchants generated and validated in {:?}", elapsed);

    assert!(
        elapsed.as_millis() < 500,
        "Merchant generation too slow: {:?}",
        elapsed
    );

    Ok(())
}

#[test]
fn test_blend_and_entity_performance() -> ForgeResult<()> {
    let registry = Arc::new(GenreRegistry::with_base_genres());
    let blender = GenreBlender::new(Arc::clone(&registry));
    let entities = EntityGenerator::new(registry);
    let params = GenerationParams::new(10, 0.5, "horror").with_count(100);

    let start = Instant::now();
    let iterations = 100;
    for seed in 0..iterations {
        let _blended = blender.blend("scifi", "horror", 0.5, seed)?;
        let _entities = entities.generate(seed, &params)?;
    }

    let elapsed = start.elapsed();
    let avg_operation_time = elapsed / iterations as u32;

    println!("Average blend + 100 entities time: {:?}", avg_operation_time);

    assert!(
        avg_operation_time.as_millis() < 50,
        "Blend and entity generation too slow: {:?}",
        avg_operation_time
    );

    Ok(())
}
