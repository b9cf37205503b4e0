use fathom_tokens::TokenCounter;
use proptest::prelude::*;

proptest! {
    #[test]
    fn cached_equals_uncached(s in ".{0,200}") {
        let counter = TokenCounter::default();
        prop_assert_eq!(counter.count(&s), counter.count_cached(&s));
    }

    #[test]
    fn subadditivity(a in ".{0,100}", b in ".{0,100}") {
        let counter = TokenCounter::default();
        let combined = format!("{}{}", a, b);
        let count_a = counter.count(&a);
        let count_b = counter.count(&b);
        prop_assert!(counter.count(&combined) <= count_a + count_b + 1);
    }

    #[test]
    fn count_is_bounded_by_length(s in ".{1,100}") {
        let counter = TokenCounter::default();
        prop_assert!(counter.count(&s) <= s.len() * 2 + 10);
    }

    #[test]
    fn usage_matches_counts(p in ".{0,100}", c in ".{0,100}") {
        let counter = TokenCounter::default();
        let usage = counter.usage(&p, &c);
        prop_assert_eq!(usage.prompt_tokens, counter.count(&p));
        prop_assert_eq!(usage.completion_tokens, counter.count(&c));
    }
}
