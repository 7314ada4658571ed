//! Genre registry and blending behaviour.

use seedforge::{presets, ForgeResult, GenreBlender, GenreRegistry};
use std::sync::Arc;

fn blender() -> GenreBlender {
    GenreBlender::new(Arc::new(GenreRegistry::with_base_genres()))
}

#[test]
fn test_blend_endpoints_reproduce_sources() -> ForgeResult<()> {
    let blender = blender();
    let registry = Arc::clone(blender.registry());
    let pairs = [
        ("fantasy", "scifi"),
        ("horror", "cyberpunk"),
        ("postapoc", "fantasy"),
    ];

    for (a, b) in pairs {
        let first = registry.require(a)?;
        let second = registry.require(b)?;

        let at_zero = blender.blend(a, b, 0.0, 31)?;
        assert_eq!(at_zero.genre.palette(), first.palette());
        assert_eq!(at_zero.genre.entity_prefixes, first.entity_prefixes);
        assert_eq!(at_zero.genre.item_prefixes, first.item_prefixes);
        assert_eq!(at_zero.genre.location_prefixes, first.location_prefixes);
        assert_eq!(at_zero.genre.naming_style, first.naming_style);

        let at_one = blender.blend(a, b, 1.0, 31)?;
        assert_eq!(at_one.genre.palette(), second.palette());
        assert_eq!(at_one.genre.entity_prefixes, second.entity_prefixes);
        assert_eq!(at_one.genre.item_prefixes, second.item_prefixes);
        assert_eq!(at_one.genre.location_prefixes, second.location_prefixes);
        assert_eq!(at_one.genre.naming_style, second.naming_style);
    }
    Ok(())
}

#[test]
fn test_blend_complement_gives_same_colors() -> ForgeResult<()> {
    let blender = blender();
    for weight in [0.1, 0.3, 0.5, 0.65, 0.9] {
        let forward = blender.blend("scifi", "horror", weight, 8)?;
        let backward = blender.blend("horror", "scifi", 1.0 - weight, 8)?;
        let pairs = forward.genre.palette().into_iter().zip(backward.genre.palette());
        for (left, right) in pairs {
            assert!(left.max_channel_delta(&right) < 1e-9, "weight {weight}");
        }
    }
    Ok(())
}

#[test]
fn test_presets_match_direct_blends() -> ForgeResult<()> {
    let blender = blender();
    for preset in presets() {
        let from_preset = blender.create_preset_blend(preset.name, 2024)?;
        let direct = blender.blend(preset.primary, preset.secondary, preset.weight, 2024)?;
        assert_eq!(from_preset, direct, "preset {}", preset.name);
        assert_eq!(from_preset.blend_weight, preset.weight);
    }

    let sci_fi_horror = blender.create_preset_blend("sci-fi-horror", 5)?;
    assert_eq!(sci_fi_horror, blender.blend("scifi", "horror", 0.5, 5)?);
    Ok(())
}

#[test]
fn test_out_of_range_weights_are_clamped() -> ForgeResult<()> {
    let blender = blender();
    assert_eq!(blender.blend("fantasy", "horror", -3.0, 1)?.blend_weight, 0.0);
    assert_eq!(blender.blend("fantasy", "horror", 7.0, 1)?.blend_weight, 1.0);
    assert_eq!(
        blender.blend("fantasy", "horror", f64::NAN, 1)?.blend_weight,
        0.0
    );
    Ok(())
}

#[test]
fn test_blend_is_deterministic_and_resolves_sources() -> ForgeResult<()> {
    let blender = blender();
    let first = blender.blend("cyberpunk", "postapoc", 0.4, 77)?;
    let second = blender.blend("cyberpunk", "postapoc", 0.4, 77)?;
    assert_eq!(first, second);

    let (primary, secondary) = first.base_genres()?;
    assert_eq!(primary.id, "cyberpunk");
    assert_eq!(secondary.id, "postapoc");
    assert!(!first.leans_secondary());
    assert!(first.genre.themes.len() <= seedforge::config::BLENDED_THEME_LIMIT);
    for theme in &first.genre.themes {
        assert!(primary.has_theme(theme) || secondary.has_theme(theme));
    }
    Ok(())
}

#[test]
fn test_blended_genre_serializes_without_registry() -> ForgeResult<()> {
    let blended = blender().create_preset_blend("cyber-horror", 3)?;
    let json = serde_json::to_value(&blended).expect("blended genre serializes");
    assert_eq!(json["primary_id"], "cyberpunk");
    assert_eq!(json["secondary_id"], "horror");
    assert_eq!(json["genre"]["id"], blended.genre.id.as_str());
    assert!(json.get("registry").is_none());
    Ok(())
}
