//! Tag filtering and random recipe picks.

use rand::seq::IndexedRandom;
use rand::Rng;

use crate::models::Recipe;

/// Recipes carrying every tag in `tags`; an empty filter keeps everything.
pub fn filter_by_tags(recipes: Vec<Recipe>, tags: &[String]) -> Vec<Recipe> {
    recipes.into_iter().filter(|r| r.has_tags(tags)).collect()
}

/// Sample up to `count` distinct recipes uniformly, without replacement.
///
/// Asking for more than are available returns all of them; an empty pool
/// returns an empty list.
pub fn pick_random<R: Rng + ?Sized>(pool: &[Recipe], count: usize, rng: &mut R) -> Vec<Recipe> {
    pool.choose_multiple(rng, count).cloned().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Ingredient;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashSet;

    fn recipes() -> Vec<Recipe> {
        [
            ("Spaghetti Aglio e Olio", vec!["italian", "vegetarian"]),
            ("Quick Pancakes", vec!["breakfast", "vegetarian"]),
            ("Chicken Salad", vec!["lunch", "gluten-free"]),
            ("Shakshuka", vec!["breakfast"]),
        ]
        .into_iter()
        .map(|(title, tags)| {
            Recipe::new(title)
                .with_ingredients(vec![Ingredient::new("water", "1l")])
                .with_tags(tags)
        })
        .collect()
    }

    fn titles(recipes: &[Recipe]) -> HashSet<String> {
        recipes.iter().map(|r| r.title.clone()).collect()
    }

    #[test]
    fn test_filter_single_tag() {
        let matched = filter_by_tags(recipes(), &["vegetarian".into()]);
        assert_eq!(
            titles(&matched),
            HashSet::from([
                "Spaghetti Aglio e Olio".to_string(),
                "Quick Pancakes".to_string()
            ])
        );
    }

    #[test]
    fn test_filter_requires_every_tag() {
        let matched = filter_by_tags(recipes(), &["breakfast".into(), "vegetarian".into()]);
        assert_eq!(matched.len(), 1);
        assert_eq!(matched[0].title, "Quick Pancakes");
    }

    #[test]
    fn test_no_filter_keeps_all() {
        assert_eq!(filter_by_tags(recipes(), &[]).len(), 4);
    }

    #[test]
    fn test_pick_exact_count_without_duplicates() {
        let mut rng = StdRng::seed_from_u64(7);
        let pool = recipes();
        for _ in 0..50 {
            let picked = pick_random(&pool, 2, &mut rng);
            assert_eq!(picked.len(), 2);
            assert_eq!(titles(&picked).len(), 2);
        }
    }

    #[test]
    fn test_pick_more_than_available_returns_all() {
        let mut rng = StdRng::seed_from_u64(42);
        let pool = filter_by_tags(recipes(), &["breakfast".into()]);
        let picked = pick_random(&pool, 10, &mut rng);
        assert_eq!(picked.len(), 2);
        assert_eq!(titles(&picked), titles(&pool));
    }

    #[test]
    fn test_pick_from_empty_pool() {
        let mut rng = StdRng::seed_from_u64(1);
        let pool = filter_by_tags(recipes(), &["dessert".into()]);
        assert!(pick_random(&pool, 3, &mut rng).is_empty());
    }

    #[test]
    fn test_pick_zero() {
        let mut rng = StdRng::seed_from_u64(1);
        assert!(pick_random(&recipes(), 0, &mut rng).is_empty());
    }

    #[test]
    fn test_every_recipe_can_be_picked() {
        let mut rng = StdRng::seed_from_u64(2024);
        let pool = recipes();
        let mut seen = HashSet::new();
        for _ in 0..200 {
            seen.extend(titles(&pick_random(&pool, 1, &mut rng)));
        }
        assert_eq!(seen, titles(&pool));
    }

    #[test]
    fn test_same_seed_same_pick() {
        let pool = recipes();
        let a = pick_random(&pool, 2, &mut StdRng::seed_from_u64(99));
        let b = pick_random(&pool, 2, &mut StdRng::seed_from_u64(99));
        assert_eq!(a, b);
    }
}
