use schemock::config::default_keyword_rules;
use schemock::domain::{FieldContext, Resolution, Resolver, RuleTable};
use serde_json::json;

fn resolver() -> Resolver {
    let rules = default_keyword_rules().unwrap();
    Resolver::new(RuleTable::from_config(&rules).unwrap())
}

fn method_for(resolver: &Resolver, path: &str) -> String {
    resolver
        .resolve(&FieldContext::from_path(path).unwrap())
        .method
}

#[test]
fn test_contact_fields() {
    let resolver = resolver();
    assert_eq!(method_for(&resolver, "contact_email"), "email");
    assert_eq!(method_for(&resolver, "emailAddress"), "email");
    assert_eq!(method_for(&resolver, "username"), "user_name");
    assert_eq!(method_for(&resolver, "phone"), "phone_number");
}

#[test]
fn test_person_fields() {
    let resolver = resolver();
    assert_eq!(method_for(&resolver, "firstName"), "first_name");
    assert_eq!(method_for(&resolver, "FÖRNAMN"), "first_name");
    assert_eq!(method_for(&resolver, "person.name"), "name");
}

#[test]
fn test_path_qualified_names() {
    let resolver = resolver();
    assert_eq!(method_for(&resolver, "project.name"), "bs");
    assert_eq!(method_for(&resolver, "organisation.project.name"), "bs");
    assert_eq!(method_for(&resolver, "application.name"), "bs");
    assert_eq!(method_for(&resolver, "businessrole.name"), "job");
}

#[test]
fn test_age_carries_args() {
    let resolution = resolver().resolve(&FieldContext::from_path("Age").unwrap());
    assert_eq!(resolution.method, "random_int");
    assert_eq!(resolution.args.get("min"), Some(&json!(0)));
    assert_eq!(resolution.args.get("max"), Some(&json!(100)));
}

#[test]
fn test_description_sentence_length() {
    let resolution = resolver().resolve(&FieldContext::from_path("item.description").unwrap());
    assert_eq!(resolution.method, "sentence");
    assert_eq!(resolution.args.get("nb_words"), Some(&json!(12)));
}

#[test]
fn test_address_fields() {
    let resolver = resolver();
    assert_eq!(method_for(&resolver, "city"), "city");
    assert_eq!(method_for(&resolver, "Gata"), "street_name");
    assert_eq!(method_for(&resolver, "address"), "address");
}

#[test]
fn test_substring_matching_reaches_inside_words() {
    let resolver = resolver();
    // "language" contains "age", and the age rule ranks above the language rule
    assert_eq!(method_for(&resolver, "language"), "random_int");
    assert_eq!(method_for(&resolver, "Språk"), "language_name");
}

#[test]
fn test_unmatched_field_falls_back() {
    let resolution = resolver().resolve(&FieldContext::from_path("xyz123").unwrap());
    assert_eq!(resolution, Resolution::method("word"));
}
