//! End-to-end generation through the public API.

use seedforge::generation::utils::derive_seed;
use seedforge::{
    EntityGenerator, ForgeError, ForgeResult, GenerationParams, Generator, GenreBlender,
    GenreRegistry, ItemGenerator, ItemType, LookupError, Merchant, MerchantGenerator, NamingStyle,
    PowerCurve, QuestGenerator, RarityTier, SpellGenerator,
};
use std::sync::Arc;

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn registry() -> Arc<GenreRegistry> {
    Arc::new(GenreRegistry::with_base_genres())
}

#[test]
fn test_fantasy_items_end_to_end() -> ForgeResult<()> {
    init_logging();
    let generator = ItemGenerator::new(registry());
    let params = GenerationParams::new(5, 0.5, "fantasy").with_count(20);

    let items = generator.generate(12345, &params)?;
    assert_eq!(items.len(), 20);
    generator.validate(&items, &params)?;

    // Twenty draws only loosely track the curve, so allow a wide band per tier
    let distribution = PowerCurve::default().distribution(5, 0.5);
    for tier in RarityTier::ALL {
        let count = items.iter().filter(|item| item.rarity == tier).count() as f64;
        let p = distribution.weight(tier);
        let expected = 20.0 * p;
        let spread = 4.0 * (20.0 * p * (1.0 - p)).sqrt() + 2.0;
        assert!(
            (count - expected).abs() <= spread,
            "{tier}: {count} items, expected about {expected:.1}"
        );
    }
    Ok(())
}

#[test]
fn test_large_batch_tracks_rarity_distribution() -> ForgeResult<()> {
    let generator = ItemGenerator::new(registry());
    let params = GenerationParams::new(5, 0.5, "fantasy").with_count(4_000);
    let items = generator.generate(12345, &params)?;

    let distribution = PowerCurve::default().distribution(5, 0.5);
    for tier in RarityTier::ALL {
        let share =
            items.iter().filter(|item| item.rarity == tier).count() as f64 / items.len() as f64;
        assert!(
            (share - distribution.weight(tier)).abs() < 0.03,
            "{tier}: share {share:.3} vs weight {:.3}",
            distribution.weight(tier)
        );
    }
    Ok(())
}

#[test]
fn test_corrupted_item_is_reported_by_name() -> ForgeResult<()> {
    let generator = ItemGenerator::new(registry());
    let params = GenerationParams::new(5, 0.5, "fantasy")
        .with_count(10)
        .with_filter(ItemType::Weapon);
    let mut items = generator.generate(12345, &params)?;
    items[4].stats.damage = -1;

    match generator.validate(&items, &params) {
        Err(ForgeError::Validation(err)) => {
            assert_eq!(err.index, 4);
            assert_eq!(err.object, items[4].name);
            assert!(err.violation.contains("damage"));
        }
        other => panic!("expected a validation error, got {other:?}"),
    }
    Ok(())
}

#[test]
fn test_every_generator_validates_its_own_output() -> ForgeResult<()> {
    init_logging();
    let registry = registry();
    for genre in registry.ids() {
        for depth in [0, 7, 42, 100] {
            let items = ItemGenerator::new(Arc::clone(&registry));
            let params = GenerationParams::new(depth, 0.5, genre).with_count(15);
            items.validate(&items.generate(1, &params)?, &params)?;

            let entities = EntityGenerator::new(Arc::clone(&registry));
            let params = GenerationParams::new(depth, 0.5, genre).with_count(15);
            entities.validate(&entities.generate(2, &params)?, &params)?;

            let merchants = MerchantGenerator::new(Arc::clone(&registry));
            let params = GenerationParams::new(depth, 0.5, genre).with_count(3);
            merchants.validate(&merchants.generate(3, &params)?, &params)?;

            let quests = QuestGenerator::new(Arc::clone(&registry));
            let params = GenerationParams::new(depth, 0.5, genre).with_count(10);
            quests.validate(&quests.generate(4, &params)?, &params)?;

            let spells = SpellGenerator::new(Arc::clone(&registry));
            let params = GenerationParams::new(depth, 0.5, genre).with_count(10);
            spells.validate(&spells.generate(5, &params)?, &params)?;
        }
    }
    Ok(())
}

#[test]
fn test_single_object_regeneration() -> ForgeResult<()> {
    let generator = ItemGenerator::new(registry());
    let params = GenerationParams::new(9, 0.3, "cyberpunk").with_count(12);
    let items = generator.generate(777, &params)?;

    let seventh = generator.generate_one(derive_seed(777, 7), &params)?;
    assert_eq!(seventh, items[7]);
    assert_eq!(items[7].seed, derive_seed(777, 7));
    Ok(())
}

#[test]
fn test_blended_genre_drives_generation() -> ForgeResult<()> {
    let base = GenreRegistry::with_base_genres();
    let blender = GenreBlender::new(Arc::new(base.clone()));
    let blended = blender.create_preset_blend("dark-fantasy", 99)?;

    // A blended definition registers like any other genre
    let id = blended.genre.id.clone();
    let registry = Arc::new(GenreRegistry::from_definitions(
        base.all().iter().cloned().chain([blended.genre.clone()]),
    ));
    let generator = ItemGenerator::new(registry);
    let params = GenerationParams::new(10, 0.5, id).with_count(10);
    let items = generator.generate(5, &params)?;
    generator.validate(&items, &params)?;

    for item in &items {
        assert!(blended
            .genre
            .item_prefixes
            .iter()
            .any(|prefix| item.name.contains(prefix.as_str())));
    }
    Ok(())
}

#[test]
fn test_scifi_leaning_blend_uses_scifi_vocabulary() -> ForgeResult<()> {
    let base = GenreRegistry::with_base_genres();
    let blender = GenreBlender::new(Arc::new(base.clone()));
    let blended = (0..64)
        .map(|seed| blender.blend("fantasy", "scifi", 0.75, seed))
        .collect::<ForgeResult<Vec<_>>>()?
        .into_iter()
        .find(|blended| blended.genre.naming_style == NamingStyle::Tech)
        .expect("a scifi-leaning blend should usually take the scifi style");

    let id = blended.genre.id.clone();
    let registry = Arc::new(GenreRegistry::from_definitions(
        base.all().iter().cloned().chain([blended.genre]),
    ));
    let generator = ItemGenerator::new(registry);
    let params = GenerationParams::new(20, 0.5, id)
        .with_count(60)
        .with_filter(ItemType::Weapon);
    let weapons = generator.generate(8, &params)?;
    generator.validate(&weapons, &params)?;

    let scifi = ["Vibroblade", "Shredder", "Rifle", "Emitter", "Monoknife", "Lance"];
    let fantasy = ["Sword", "Axe", "Bow", "Staff", "Dagger", "Spear"];
    for weapon in &weapons {
        let words: Vec<&str> = weapon.name.split_whitespace().collect();
        assert!(
            words.iter().any(|word| scifi.contains(word)),
            "{}",
            weapon.name
        );
        assert!(
            !words.iter().any(|word| fantasy.contains(word)),
            "{}",
            weapon.name
        );
    }
    Ok(())
}

#[test]
fn test_unknown_ids_surface_as_lookup_errors() {
    let registry = registry();
    let params = GenerationParams::new(1, 0.5, "western");
    assert_eq!(
        QuestGenerator::new(Arc::clone(&registry))
            .generate(1, &params)
            .unwrap_err(),
        ForgeError::Lookup(LookupError::UnknownGenre("western".to_string()))
    );

    let blender = GenreBlender::new(registry);
    assert_eq!(
        blender.create_preset_blend("space-western", 1).unwrap_err(),
        ForgeError::Lookup(LookupError::UnknownPreset("space-western".to_string()))
    );
    assert!(blender.blend("fantasy", "western", 0.5, 1).is_err());
}

#[test]
fn test_generated_content_serializes() -> ForgeResult<()> {
    let registry = registry();
    let params = GenerationParams::new(3, 0.5, "scifi").with_count(2);
    let merchants = MerchantGenerator::new(registry).generate(21, &params)?;

    let json = serde_json::to_string(&merchants).expect("merchants serialize");
    let restored: Vec<Merchant> =
        serde_json::from_str(&json).expect("merchants deserialize");
    assert_eq!(restored, merchants);
    Ok(())
}
