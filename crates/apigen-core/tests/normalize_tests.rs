use apigen_core::parse;
use apigen_core::parse::schema::SchemaOrRef;
use apigen_core::transform::name_normalizer::{camel_case, ref_name, route_name};
use apigen_core::transform::preprocess_components;

const PETSTORE: &str = include_str!("fixtures/petstore.yaml");

#[test]
fn test_camel_case_input() {
    assert_eq!(camel_case("createChatCompletion"), "createChatCompletion");
    assert_eq!(camel_case("ChatMessage"), "chatMessage");
}

#[test]
fn test_snake_and_kebab_input() {
    assert_eq!(camel_case("chat_message"), "chatMessage");
    assert_eq!(camel_case("pet-store-api"), "petStoreApi");
}

#[test]
fn test_route_names() {
    assert_eq!(route_name("POST", "/pets"), "postPets");
    assert_eq!(route_name("GET", "/store/inventory"), "getStoreInventory");
    assert_eq!(route_name("PATCH", "/pets/{pet-id}"), "patchPetsByPetId");
}

#[test]
fn test_route_names_with_two_parameters() {
    let names = [
        route_name("get", "/users/{userId}/posts/{postId}"),
        route_name("PUT", "/orders/{orderId}/items"),
    ];
    insta::assert_snapshot!(names.join("\n"), @r"
    getUsersByUserIdPostsAndPostId
    putOrdersByOrderIdItems
    ");
}

#[test]
fn test_ref_name_with_leading_digit() {
    assert_eq!(ref_name("#/components/schemas/2xx"), "components/schemas/2xx");
    assert_eq!(ref_name("#/components/schemas/Pet2"), "Pet2");
}

#[test]
fn test_preprocess_petstore_tags_every_component() {
    let mut spec = parse::from_yaml(PETSTORE).unwrap();
    let discriminating = preprocess_components(&mut spec);
    assert!(discriminating.is_empty());
    for (name, schema) in &spec.components.as_ref().unwrap().schemas {
        let SchemaOrRef::Schema(schema) = schema else {
            continue;
        };
        assert_eq!(
            schema.component_ref_path.as_deref(),
            Some(format!("#/components/schemas/{name}").as_str())
        );
    }
}
