//! End-to-end editing flow: catalog → ledger → commit → list → export

use sipbook_common::export::{render_all, render_one};
use sipbook_common::model::presets::PresetCatalog;
use sipbook_common::{
    CatalogSet, Category, Composition, CompositionStore, DrinkKind, Error, MemoryCompositionStore,
};

#[tokio::test]
async fn test_customize_preset_with_custom_option_and_share() {
    let presets = PresetCatalog::builtin();
    let preset = presets.find("virgin mojito").unwrap().clone();
    assert_eq!(preset.kind, DrinkKind::Mocktail);

    let mut catalogs = CatalogSet::with_defaults();
    let mut c = Composition::create_from(&preset);

    let bases = catalogs.get_mut(Category::NonAlcoholicBase);
    assert!(bases.add_and_select("  Coconut Water ", c.ledger_mut(Category::NonAlcoholicBase).unwrap()));
    assert!(bases.contains("coconut water"));
    c.set_quantity(Category::NonAlcoholicBase, "Coconut Water", 2).unwrap();
    c.toggle(Category::NonAlcoholicBase, "Soda Water").unwrap();
    c.toggle(Category::Garnish, "Mint").unwrap();

    // Liqueurs do not exist on a mocktail
    assert!(matches!(
        c.toggle(Category::Liqueur, "Aperol"),
        Err(Error::NotApplicable { .. })
    ));

    let store = MemoryCompositionStore::new();
    let saved = c.commit("Tropical Nojito", &store).await.unwrap();
    assert_eq!(saved.na_bases, vec!["Coconut Water", "Soda Water"]);
    assert!(saved.spirits.is_empty());
    assert!(saved.liqueurs.is_empty());

    let text = render_one(&saved);
    assert!(text.starts_with("Name: Tropical Nojito\n"));
    assert!(text.contains("Base: Coconut Water (2 parts), Soda Water (1 part)\n"));
    assert!(text.contains("Liqueur: None\n"));
    assert!(text.contains("Garnish: Mint\n"));

    let all = store.list_all().await.unwrap();
    assert!(render_all(&all).contains("Name: Tropical Nojito"));
}

#[tokio::test]
async fn test_deselect_drops_quantity_on_commit() {
    let presets = PresetCatalog::builtin();
    let preset = presets.find("Margarita").unwrap();
    let store = MemoryCompositionStore::new();
    let mut c = Composition::create_from(preset);

    c.toggle(Category::Spirit, "Tequila").unwrap();
    c.set_quantity(Category::Spirit, "Tequila", 3).unwrap();
    c.toggle(Category::Spirit, "Tequila").unwrap();
    let saved = c.commit("", &store).await.unwrap();

    assert!(saved.spirits.is_empty());
    assert!(saved.shots_per_spirit.is_empty());
    assert_eq!(saved.name, "Margarita");
}

#[tokio::test]
async fn test_failed_update_keeps_edits_for_retry() {
    let presets = PresetCatalog::builtin();
    let preset = presets.find("Mojito").unwrap();
    let store = MemoryCompositionStore::new();
    let mut c = Composition::create_from(preset);
    c.commit("", &store).await.unwrap();

    // Someone else cleared the store
    store.delete_all().await.unwrap();
    c.toggle(Category::Garnish, "Mint").unwrap();
    assert!(matches!(c.commit("", &store).await, Err(Error::NotFound(_))));
    assert!(c.ledger(Category::Garnish).unwrap().is_selected("Mint"));
}
