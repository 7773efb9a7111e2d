use proptest::prelude::*;
use roster_identity::{normalize, IdentityIndex, Resolver, Slug};

/// Names built from the characters that show up in real planning sheets:
/// Czech and German letters, stray combining marks, odd spaces and invisible marks.
fn messy_name() -> impl Strategy<Value = String> {
    proptest::string::string_regex(
        "[a-zA-ZáčďéěíňóřšťúůýžÁČĎÉĚÍŇÓŘŠŤÚŮÝŽäöüßẞñÑøłđ \t\u{00A0}\u{202F}\u{200B}\u{200D}\u{FEFF}\u{0301}\u{030C}.'-]{0,40}",
    )
    .unwrap()
}

proptest! {
    #[test]
    fn prop_normalize_is_idempotent(name in messy_name()) {
        let once = normalize(&name);
        prop_assert_eq!(normalize(once.as_str()), once);
    }

    #[test]
    fn prop_normalize_any_string_is_idempotent(name in any::<String>()) {
        let once = normalize(&name);
        prop_assert_eq!(normalize(once.as_str()), once);
    }

    #[test]
    fn prop_normalize_has_no_edge_or_double_spaces(name in messy_name()) {
        let key = normalize(&name);
        let s = key.as_str();
        prop_assert!(!s.starts_with(' '));
        prop_assert!(!s.ends_with(' '));
        prop_assert!(!s.contains("  "));
        prop_assert!(!s.contains('\u{00A0}'), "output contains U+00A0");
        prop_assert!(!s.contains('\u{200B}'), "output contains U+200B");
    }

    #[test]
    fn prop_case_and_spacing_do_not_change_key(name in "[a-zA-Záéíóúřšž]{1,12}( [a-zA-Záéíóúřšž]{1,12}){0,2}") {
        let shouted = name.to_uppercase();
        let spaced = name.replace(' ', "\u{00A0}  ");
        prop_assert_eq!(normalize(&shouted), normalize(&name));
        prop_assert_eq!(normalize(&spaced), normalize(&name));
    }

    #[test]
    fn prop_derived_slug_parses(name in messy_name()) {
        let slug = Slug::derive(&normalize(&name));
        prop_assert!(slug.as_str().parse::<Slug>().is_ok());
    }

    #[test]
    fn prop_resolver_finds_every_indexed_spelling(name in "[A-Za-zčřšžáé]{2,10} [A-Za-zčřšžáé]{2,10}") {
        let key = normalize(&name);
        let engineer = roster_identity::EngineerRecord::new(
            roster_identity::EngineerId::new(),
            name.clone(),
            Slug::derive(&key),
            roster_identity::EngineerStatus::Active,
        );
        let index = IdentityIndex::build(vec![engineer.clone()]);
        let resolver = Resolver::new(&index);

        let lowered = name.to_lowercase();
        prop_assert_eq!(resolver.resolve(&lowered).engineer().map(|e| e.id), Some(engineer.id));
        prop_assert_eq!(resolver.resolve(&format!("  {name} ")).engineer().map(|e| e.id), Some(engineer.id));
    }
}
