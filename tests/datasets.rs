// Dataset invariants for the bundled poems.
// These tests are native-friendly and avoid wasm/browser APIs.

use std::collections::HashSet;

use karuta::{CardPool, DEMO_POEMS, GameConfig};

#[test]
fn demo_poems_are_unique_and_complete() {
    let mut ids = HashSet::new();
    let mut uppers = HashSet::new();
    for poem in DEMO_POEMS {
        assert!(ids.insert(poem.id), "duplicate poem id {}", poem.id);
        assert!(uppers.insert(&*poem.first_half), "duplicate upper verse '{}'", poem.first_half);
        assert!(!poem.first_half.trim().is_empty(), "empty upper verse for poem {}", poem.id);
        assert!(!poem.second_half.trim().is_empty(), "empty lower verse for poem {}", poem.id);
        assert!(poem.author.is_some(), "poem {} has no author", poem.id);
        let image = poem.image.as_deref().unwrap_or_default();
        assert!(image.starts_with("https://"), "poem {} image '{}' is not https", poem.id, image);
    }
}

#[test]
fn demo_pool_fills_a_grid_round() {
    let pool = CardPool::from_static(DEMO_POEMS).expect("demo pool is valid");
    assert!(pool.len() >= 4);
    assert_eq!(GameConfig::grid().round_size.resolve(pool.len()), 4);
    assert_eq!(GameConfig::table().round_size.resolve(pool.len()), DEMO_POEMS.len());
}
