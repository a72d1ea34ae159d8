use super::resolver::{Resolver, DEFAULT_FALLBACK_METHOD};
use super::rules::RuleTable;
use super::{FieldContext, GeneratorArgs, Resolution};
use crate::config::{KeywordPatternConfig, KeywordRuleConfig};
use serde_json::json;
use std::collections::BTreeMap;
use std::sync::Arc;

fn rule(keywords: &[&str], method: &str) -> KeywordRuleConfig {
    KeywordRuleConfig {
        keywords: keywords
            .iter()
            .map(|k| KeywordPatternConfig::Keyword(k.to_string()))
            .collect(),
        method: method.to_string(),
        args: GeneratorArgs::new(),
    }
}

fn path_rule(ancestor: &str, child: &str, method: &str) -> KeywordRuleConfig {
    let mut mapping = BTreeMap::new();
    mapping.insert(ancestor.to_string(), child.to_string());
    KeywordRuleConfig {
        keywords: vec![KeywordPatternConfig::Path(mapping)],
        method: method.to_string(),
        args: GeneratorArgs::new(),
    }
}

fn args(value: serde_json::Value) -> GeneratorArgs {
    value.as_object().cloned().unwrap()
}

fn resolver(records: Vec<KeywordRuleConfig>) -> Resolver {
    Resolver::new(RuleTable::from_config(&records).unwrap())
}

fn field(name: &str) -> FieldContext {
    FieldContext::new(name, Vec::<String>::new()).unwrap()
}

#[test]
fn test_email_and_name_scenario() {
    let resolver = resolver(vec![rule(&["email"], "email"), rule(&["name"], "name")]);

    assert_eq!(
        resolver.resolve(&field("contact_email")),
        Resolution::method("email")
    );
    // "name" occurs inside "username" and there is no user rule
    assert_eq!(resolver.resolve(&field("username")), Resolution::method("name"));
}

#[test]
fn test_args_are_returned_with_method() {
    let resolver = resolver(vec![KeywordRuleConfig {
        args: args(json!({ "min": 0, "max": 100 })),
        ..rule(&["age"], "random_int")
    }]);

    let resolution = resolver.resolve(&field("Age"));
    assert_eq!(resolution.method, "random_int");
    assert_eq!(resolution.args, args(json!({ "min": 0, "max": 100 })));
}

#[test]
fn test_earlier_rule_wins() {
    let resolver = resolver(vec![
        rule(&["user"], "user_name"),
        rule(&["name"], "name"),
    ]);
    assert_eq!(resolver.resolve(&field("username")).method, "user_name");

    let reversed = self::resolver(vec![
        rule(&["name"], "name"),
        rule(&["user"], "user_name"),
    ]);
    assert_eq!(reversed.resolve(&field("username")).method, "name");
}

#[test]
fn test_any_pattern_in_rule_matches() {
    let resolver = resolver(vec![rule(&["phone", "tel", "mobile"], "phone_number")]);

    for name in ["phoneNumber", "TEL", "mobile_primary"] {
        assert_eq!(resolver.resolve(&field(name)).method, "phone_number");
    }
}

#[test]
fn test_path_qualified_rule_uses_ancestors() {
    let resolver = resolver(vec![path_rule("project", "name", "bs"), rule(&["name"], "name")]);

    let in_project = FieldContext::new("Name", ["Project"]).unwrap();
    let in_person = FieldContext::new("Name", ["Person"]).unwrap();

    assert_eq!(resolver.resolve(&in_project).method, "bs");
    assert_eq!(resolver.resolve(&in_person).method, "name");
}

#[test]
fn test_path_qualified_rule_matches_any_ancestor_depth() {
    let resolver = resolver(vec![path_rule("project", "name", "bs")]);

    let nested = FieldContext::from_path("portfolio.project.owner.name").unwrap();
    assert_eq!(resolver.resolve(&nested).method, "bs");
}

#[test]
fn test_path_qualified_child_is_not_substring() {
    let resolver = resolver(vec![path_rule("project", "name", "bs")]);

    let field = FieldContext::new("nickname", ["project"]).unwrap();
    assert_eq!(resolver.resolve(&field).method, DEFAULT_FALLBACK_METHOD);
}

#[test]
fn test_unmatched_field_gets_fallback() {
    let resolver = resolver(vec![rule(&["email"], "email")]);
    assert_eq!(
        resolver.resolve(&field("xyz123")),
        Resolution::method(DEFAULT_FALLBACK_METHOD)
    );
}

#[test]
fn test_empty_table_always_falls_back() {
    let resolver = Resolver::new(RuleTable::default());
    assert_eq!(resolver.resolve(&field("email")).method, DEFAULT_FALLBACK_METHOD);
    assert!(resolver.find_match(&field("email")).is_none());
}

#[test]
fn test_custom_fallback() {
    let fallback = Resolution::new("sentence", args(json!({ "nb_words": 3 })));
    let resolver = Resolver::with_fallback(RuleTable::default(), fallback.clone());
    assert_eq!(resolver.resolve(&field("anything")), fallback);
}

#[test]
fn test_resolution_is_idempotent() {
    let resolver = resolver(vec![
        KeywordRuleConfig {
            args: args(json!({ "nb_words": 12 })),
            ..rule(&["description"], "sentence")
        },
        rule(&["name"], "name"),
    ]);

    let field = FieldContext::new("Description", ["product"]).unwrap();
    let first = resolver.resolve(&field);
    let second = resolver.resolve(&field);
    assert_eq!(first, second);
}

#[test]
fn test_resolution_is_a_copy() {
    let resolver = resolver(vec![KeywordRuleConfig {
        args: args(json!({ "min": 1, "max": 99 })),
        ..rule(&["amount"], "random_int")
    }]);

    let mut resolution = resolver.resolve(&field("amount"));
    resolution.args.insert("max".to_string(), json!(5));

    let again = resolver.resolve(&field("amount"));
    assert_eq!(again.args.get("max"), Some(&json!(99)));
}

#[test]
fn test_non_ascii_keywords_fold_case() {
    let resolver = resolver(vec![
        rule(&["förnamn"], "first_name"),
        rule(&["språk"], "language_name"),
        rule(&["gata"], "street_name"),
    ]);

    assert_eq!(resolver.resolve(&field("FÖRNAMN")).method, "first_name");
    assert_eq!(resolver.resolve(&field("ModersSpråk")).method, "language_name");
    assert_eq!(resolver.resolve(&field("Gatuadress")).method, DEFAULT_FALLBACK_METHOD);
    assert_eq!(resolver.resolve(&field("GATA")).method, "street_name");
}

#[test]
fn test_find_match_reports_positions() {
    let resolver = resolver(vec![
        rule(&["email"], "email"),
        rule(&["street", "road", "gata"], "street_name"),
    ]);

    let found = resolver.find_match(&field("Huvudgata")).unwrap();
    assert_eq!(found.rule_index, 1);
    assert_eq!(found.pattern_index, 2);
    assert_eq!(found.rule.method(), "street_name");
}

#[test]
fn test_concurrent_resolution_shares_resolver() {
    let resolver = Arc::new(resolver(vec![
        rule(&["email"], "email"),
        rule(&["name"], "name"),
    ]));

    std::thread::scope(|scope| {
        for _ in 0..4 {
            let resolver = Arc::clone(&resolver);
            scope.spawn(move || {
                for _ in 0..100 {
                    assert_eq!(resolver.resolve(&field("user_email")).method, "email");
                    assert_eq!(resolver.resolve(&field("full_name")).method, "name");
                }
            });
        }
    });
}

#[test]
fn test_independent_resolvers_coexist() {
    let english = resolver(vec![rule(&["city"], "city")]);
    let swedish = resolver(vec![rule(&["stad"], "city")]);

    assert_eq!(english.resolve(&field("city")).method, "city");
    assert_eq!(swedish.resolve(&field("city")).method, DEFAULT_FALLBACK_METHOD);
    assert_eq!(swedish.resolve(&field("Stad")).method, "city");
}
