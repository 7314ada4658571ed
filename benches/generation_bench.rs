use criterion::{black_box, criterion_group, criterion_main, Criterion};
use seedforge::{
    EntityGenerator, GenerationParams, Generator, GenreBlender, GenreRegistry, ItemGenerator,
    MerchantGenerator, PowerCurve, QuestGenerator, SpellGenerator,
};
use std::sync::Arc;

fn registry() -> Arc<GenreRegistry> {
    Arc::new(GenreRegistry::with_base_genres())
}

fn bench_power_curve(c: &mut Criterion) {
    let curve = PowerCurve::default();

    c.bench_function("rarity_distribution", |b| {
        b.iter(|| curve.distribution(black_box(42), black_box(0.5)))
    });
}

fn bench_item_generation(c: &mut Criterion) {
    let generator = ItemGenerator::new(registry());
    let params = GenerationParams::new(10, 0.5, "fantasy").with_count(100);

    c.bench_function("generate_items_100", |b| {
        b.iter(|| generator.generate(black_box(12345), &params))
    });

    c.bench_function("generate_item_one", |b| {
        b.iter(|| generator.generate_one(black_box(12345), &params))
    });
}

fn bench_domain_generators(c: &mut Criterion) {
    let registry = registry();

    let entities = EntityGenerator::new(Arc::clone(&registry));
    let params = GenerationParams::new(10, 0.5, "horror").with_count(100);
    c.bench_function("generate_entities_100", |b| {
        b.iter(|| entities.generate(black_box(42), &params))
    });

    let merchants = MerchantGenerator::new(Arc::clone(&registry));
    let params = GenerationParams::new(10, 0.5, "cyberpunk").with_count(10);
    c.bench_function("generate_merchants_10", |b| {
        b.iter(|| merchants.generate(black_box(42), &params))
    });

    let quests = QuestGenerator::new(Arc::clone(&registry));
    let params = GenerationParams::new(10, 0.5, "postapoc").with_count(20);
    c.bench_function("generate_quests_20", |b| {
        b.iter(|| quests.generate(black_box(42), &params))
    });

    let spells = SpellGenerator::new(registry);
    let params = GenerationParams::new(10, 0.5, "scifi").with_count(20);
    c.bench_function("generate_spells_20", |b| {
        b.iter(|| spells.generate(black_box(42), &params))
    });
}

fn bench_genre_blending(c: &mut Criterion) {
    let blender = GenreBlender::new(registry());

    c.bench_function("blend_genres", |b| {
        b.iter(|| blender.blend("scifi", "horror", black_box(0.5), black_box(7)))
    });

    c.bench_function("create_preset_blend", |b| {
        b.iter(|| blender.create_preset_blend("dark-fantasy", black_box(7)))
    });
}

criterion_group!(
    benches,
    bench_power_curve,
    bench_item_generation,
    bench_domain_generators,
    bench_genre_blending,
);
criterion_main!(benches);
