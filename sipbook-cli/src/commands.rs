//! Subcommands
//!
//! Every command renders its result into a `String` so the dispatcher can
//! be exercised without a terminal.

use std::fmt::Write as _;
use std::sync::Arc;

use anyhow::{anyhow, bail, Context, Result};
use clap::{Args as ClapArgs, Subcommand};
use tracing::warn;
use uuid::Uuid;

use sipbook_common::export::{render_all, render_one};
use sipbook_common::lookup::{LookupSession, SessionLoad};
use sipbook_common::model::presets::PresetCatalog;
use sipbook_common::{
    time, CatalogSet, Category, Composition, CompositionStore, DrinkKind, PresetDrink,
    RecipeLookupService, Rim, SavedDrink,
};

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List presets, optionally filtered by kind and name prefix
    Presets {
        #[arg(long)]
        kind: Option<DrinkKind>,
        #[arg(long, default_value = "")]
        search: String,
    },
    /// Show a preset's original ingredients
    Lookup { preset: String },
    /// Start from a preset and save a new composition
    Create {
        preset: String,
        #[command(flatten)]
        edits: EditArgs,
    },
    /// List saved compositions, most recently updated first
    List,
    /// Show one saved composition
    Show {
        id: Uuid,
        /// Also look up the preset's original ingredients
        #[arg(long)]
        original: bool,
    },
    /// Change a saved composition
    Edit {
        id: Uuid,
        #[command(flatten)]
        edits: EditArgs,
    },
    /// Delete a saved composition
    Delete { id: Uuid },
    /// Delete every saved composition
    Clear {
        /// Required; the deletion cannot be undone
        #[arg(long)]
        yes: bool,
    },
    /// Render saved compositions as shareable text (all when no ids given)
    Export { ids: Vec<Uuid> },
}

/// Edits shared by `create` and `edit`. A category flag replaces that
/// category's whole selection; entries are `Name` or `Name=quantity`.
#[derive(ClapArgs, Debug, Default, Clone)]
pub struct EditArgs {
    #[arg(long)]
    pub name: Option<String>,
    #[arg(long = "spirit")]
    pub spirits: Vec<String>,
    #[arg(long = "base")]
    pub bases: Vec<String>,
    #[arg(long = "mixer")]
    pub mixers: Vec<String>,
    #[arg(long = "liqueur")]
    pub liqueurs: Vec<String>,
    #[arg(long = "garnish")]
    pub garnishes: Vec<String>,
    /// Empty selection for a category, e.g. `--clear mixer`
    #[arg(long = "clear")]
    pub cleared: Vec<Category>,
    /// None, Salt, Sugar or Tajin
    #[arg(long)]
    pub rim: Option<String>,
    #[arg(long)]
    pub notes: Option<String>,
}

impl EditArgs {
    fn selections(&self) -> [(Category, &[String]); 5] {
        [
            (Category::Spirit, self.spirits.as_slice()),
            (Category::NonAlcoholicBase, self.bases.as_slice()),
            (Category::Mixer, self.mixers.as_slice()),
            (Category::Liqueur, self.liqueurs.as_slice()),
            (Category::Garnish, self.garnishes.as_slice()),
        ]
    }
}

/// `"Tequila=2"` → `("Tequila", Some(2))`, `"Lime"` → `("Lime", None)`
pub fn parse_selection(raw: &str) -> Result<(String, Option<i32>)> {
    match raw.rsplit_once('=') {
        Some((name, quantity)) => {
            let quantity = quantity
                .trim()
                .parse::<i32>()
                .with_context(|| format!("bad quantity in {raw:?}"))?;
            Ok((name.trim().to_string(), Some(quantity)))
        }
        None => Ok((raw.trim().to_string(), None)),
    }
}

pub struct App {
    store: Arc<dyn CompositionStore>,
    lookup: RecipeLookupService,
    presets: PresetCatalog,
    catalogs: CatalogSet,
}

impl App {
    pub fn new(store: Arc<dyn CompositionStore>, lookup: RecipeLookupService) -> Self {
        Self {
            store,
            lookup,
            presets: PresetCatalog::builtin(),
            catalogs: CatalogSet::with_defaults(),
        }
    }

    pub async fn run(&mut self, command: Command) -> Result<String> {
        match command {
            Command::Presets { kind, search } => Ok(self.presets(kind, &search)),
            Command::Lookup { preset } => {
                let preset = self.preset(&preset)?.clone();
                Ok(self.original_recipe(&preset).await)
            }
            Command::Create { preset, edits } => self.create(&preset, &edits).await,
            Command::List => self.list().await,
            Command::Show { id, original } => self.show(id, original).await,
            Command::Edit { id, edits } => self.edit(id, &edits).await,
            Command::Delete { id } => self.delete(id).await,
            Command::Clear { yes } => self.clear(yes).await,
            Command::Export { ids } => self.export(&ids).await,
        }
    }

    fn presets(&self, kind: Option<DrinkKind>, search: &str) -> String {
        let kinds = match kind {
            Some(kind) => vec![kind],
            None => DrinkKind::ALL.to_vec(),
        };
        let mut out = String::new();
        for kind in kinds {
            for preset in self.presets.filter(kind, search) {
                let _ = writeln!(out, "{:<8}  {}", kind.as_str(), preset.name);
            }
        }
        if out.is_empty() {
            out.push_str("No presets match\n");
        }
        out
    }

    fn preset(&self, name: &str) -> Result<&PresetDrink> {
        self.presets
            .find(name)
            .ok_or_else(|| anyhow!("unknown preset {name:?}"))
    }

    /// Lookup failures are reported in the output, never as a command failure
    async fn original_recipe(&self, preset: &PresetDrink) -> String {
        let session = LookupSession::for_preset(preset);
        match session.load(&self.lookup).await {
            Ok(SessionLoad::Fetched(ingredients)) | Ok(SessionLoad::Cached(ingredients)) => {
                let mut out = format!("Original {}:\n", preset.name);
                for ingredient in ingredients {
                    let _ = writeln!(out, "  - {ingredient}");
                }
                out
            }
            Ok(SessionLoad::InFlight) => format!("Lookup for {} already in progress\n", preset.name),
            Err(e) => {
                warn!(preset = %preset.name, error = %e, "Original recipe lookup failed");
                format!("Could not load original {}: {}\n", preset.name, e)
            }
        }
    }

    async fn create(&mut self, preset: &str, edits: &EditArgs) -> Result<String> {
        let preset = self.preset(preset)?.clone();
        let mut composition = Composition::create_from(&preset);
        self.apply(&mut composition, edits)?;
        let final_name = edits.name.clone().unwrap_or_default();
        let saved = composition
            .commit(&final_name, self.store.as_ref())
            .await
            .context("Failed to save composition")?;
        Ok(format!("Saved {} ({})\n", saved.name, saved.id))
    }

    async fn edit(&mut self, id: Uuid, edits: &EditArgs) -> Result<String> {
        let record = self.fetch(id).await?;
        let mut composition = Composition::from_record(record)?;
        self.apply(&mut composition, edits)?;
        let final_name = edits
            .name
            .clone()
            .unwrap_or_else(|| composition.name().to_string());
        let saved = composition
            .commit(&final_name, self.store.as_ref())
            .await
            .context("Failed to save composition")?;
        Ok(format!("Updated {} ({})\n", saved.name, saved.id))
    }

    /// Apply edits; unknown option names become custom catalog entries
    fn apply(&mut self, composition: &mut Composition, edits: &EditArgs) -> Result<()> {
        let rim = edits
            .rim
            .as_deref()
            .map(|raw| {
                Rim::parse(raw).ok_or_else(|| {
                    anyhow!("unknown rim {raw:?} (expected None, Salt, Sugar or Tajin)")
                })
            })
            .transpose()?;

        for &category in &edits.cleared {
            composition.replace_selection(category, Vec::<String>::new())?;
        }

        for (category, entries) in edits.selections() {
            if entries.is_empty() {
                continue;
            }
            let parsed = entries
                .iter()
                .map(|raw| parse_selection(raw))
                .collect::<Result<Vec<_>>>()?;

            composition.replace_selection(category, Vec::<String>::new())?;
            let catalog = self.catalogs.get_mut(category);
            for (name, quantity) in parsed {
                if !catalog.add_and_select(&name, composition.ledger_mut(category)?) {
                    bail!("empty {} entry", category.label().to_lowercase());
                }
                let canonical = catalog.find(&name).unwrap_or(name.as_str()).to_string();
                if let Some(value) = quantity {
                    composition.set_quantity(category, &canonical, value)?;
                }
            }
        }

        if let Some(rim) = rim {
            composition.set_rim(rim);
        }
        if let Some(notes) = &edits.notes {
            composition.set_notes(notes);
        }
        Ok(())
    }

    async fn fetch(&self, id: Uuid) -> Result<SavedDrink> {
        self.store
            .get(id)
            .await?
            .ok_or_else(|| anyhow!("no saved composition with id {id}"))
    }

    async fn list(&self) -> Result<String> {
        let all = self.store.list_all().await?;
        if all.is_empty() {
            return Ok("No saved creations\n".to_string());
        }
        let mut out = String::new();
        for record in all {
            let _ = writeln!(
                out,
                "{}  {:<8}  {}  (updated {})",
                record.id,
                record.kind.as_str(),
                record.name,
                time::to_sortable(&record.updated_at)
            );
        }
        Ok(out)
    }

    async fn show(&self, id: Uuid, original: bool) -> Result<String> {
        let record = self.fetch(id).await?;
        let mut out = render_one(&record);
        let _ = writeln!(out, "Created: {}", time::to_sortable(&record.created_at));
        let _ = writeln!(out, "Updated: {}", time::to_sortable(&record.updated_at));
        if original {
            // Only the saved name is stored; a renamed composition no longer names its preset
            match self.presets.find(&record.name).filter(|p| p.kind == record.kind) {
                Some(preset) => {
                    let preset = preset.clone();
                    out.push_str(&self.original_recipe(&preset).await);
                }
                None => {
                    let _ = writeln!(
                        out,
                        "Original recipe unavailable: {:?} does not name a preset",
                        record.name
                    );
                }
            }
        }
        Ok(out)
    }

    async fn delete(&self, id: Uuid) -> Result<String> {
        let record = self.fetch(id).await?;
        Composition::from_record(record)?
            .delete(self.store.as_ref())
            .await
            .context("Failed to delete composition")?;
        Ok(format!("Deleted {id}\n"))
    }

    async fn clear(&self, confirmed: bool) -> Result<String> {
        if !confirmed {
            bail!("refusing to delete all saved creations without --yes");
        }
        let count = self.store.delete_all().await.context("Failed to clear saved creations")?;
        let plural = if count == 1 { "" } else { "s" };
        Ok(format!("Deleted {count} creation{plural}\n"))
    }

    async fn export(&self, ids: &[Uuid]) -> Result<String> {
        let records = if ids.is_empty() {
            self.store.list_all().await?
        } else {
            let mut records = Vec::with_capacity(ids.len());
            for &id in ids {
                records.push(self.fetch(id).await?);
            }
            records
        };
        Ok(render_all(&records))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sipbook_common::lookup::{LocalRecipeSource, RemoteRecipeSource};
    use sipbook_common::MemoryCompositionStore;

    fn app() -> (App, Arc<MemoryCompositionStore>) {
        let store = Arc::new(MemoryCompositionStore::new());
        let remote = RemoteRecipeSource::new(None).unwrap();
        let lookup = RecipeLookupService::new(
            Arc::new(remote),
            Arc::new(LocalRecipeSource::bundled()),
        );
        (App::new(store.clone(), lookup), store)
    }

    fn edits() -> EditArgs {
        EditArgs::default()
    }

    #[test]
    fn test_parse_selection() {
        assert_eq!(parse_selection("Tequila=2").unwrap(), ("Tequila".to_string(), Some(2)));
        assert_eq!(parse_selection(" Lime ").unwrap(), ("Lime".to_string(), None));
        assert!(parse_selection("Gin=lots").is_err());
    }

    #[tokio::test]
    async fn test_presets_filtered_by_kind_and_prefix() {
        let (mut app, _) = app();
        let out = app
            .run(Command::Presets {
                kind: Some(DrinkKind::Mocktail),
                search: "virgin".to_string(),
            })
            .await
            .unwrap();
        assert!(out.contains("Virgin Margarita"));
        assert!(out.contains("Virgin Mojito"));
        assert!(!out.contains("Shirley Temple"));
    }

    #[tokio::test]
    async fn test_create_with_custom_option_and_quantities() {
        let (mut app, store) = app();
        let mut e = edits();
        e.name = Some("Spicy Marg".to_string());
        e.spirits = vec!["tequila=2".to_string()];
        e.mixers = vec!["Jalapeno Syrup=1".to_string(), "Lime Juice".to_string()];
        e.rim = Some("tajin".to_string());

        app.run(Command::Create { preset: "Margarita".to_string(), edits: e })
            .await
            .unwrap();

        let saved = &store.list_all().await.unwrap()[0];
        assert_eq!(saved.name, "Spicy Marg");
        // Existing catalog spelling wins over the typed one
        assert_eq!(saved.spirits, vec!["Tequila"]);
        assert_eq!(saved.shots_per_spirit.get("Tequila"), Some(&2));
        assert_eq!(saved.mixers, vec!["Jalapeno Syrup", "Lime Juice"]);
        assert_eq!(saved.rim, Rim::Tajin);
    }

    #[tokio::test]
    async fn test_create_rejects_inapplicable_category() {
        let (mut app, store) = app();
        let mut e = edits();
        e.liqueurs = vec!["Aperol".to_string()];

        let result = app
            .run(Command::Create { preset: "Shirley Temple".to_string(), edits: e })
            .await;
        assert!(result.is_err());
        assert!(store.list_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_edit_replaces_category_and_keeps_others() {
        let (mut app, store) = app();
        let mut e = edits();
        e.spirits = vec!["Gin".to_string()];
        e.garnishes = vec!["Lemon Twist".to_string()];
        app.run(Command::Create { preset: "Martini".to_string(), edits: e })
            .await
            .unwrap();
        let id = store.list_all().await.unwrap()[0].id;

        let mut e = edits();
        e.spirits = vec!["Vodka=3".to_string()];
        e.notes = Some("very dry".to_string());
        app.run(Command::Edit { id, edits: e }).await.unwrap();

        let saved = store.get(id).await.unwrap().unwrap();
        assert_eq!(saved.name, "Martini");
        assert_eq!(saved.spirits, vec!["Vodka"]);
        assert_eq!(saved.shots_per_spirit.len(), 1);
        assert_eq!(saved.garnishes, vec!["Lemon Twist"]);
        assert_eq!(saved.notes, "very dry");
    }

    #[tokio::test]
    async fn test_lookup_failure_is_reported_not_raised() {
        let (mut app, _) = app();
        let out = app
            .run(Command::Lookup { preset: "Mojito".to_string() })
            .await
            .unwrap();
        assert!(out.contains("missing API key"));
    }

    #[tokio::test]
    async fn test_lookup_mocktail_from_bundled_dataset() {
        let (mut app, _) = app();
        let out = app
            .run(Command::Lookup { preset: "Shirley Temple".to_string() })
            .await
            .unwrap();
        assert!(out.starts_with("Original Shirley Temple:"));
    }

    #[tokio::test]
    async fn test_clear_requires_confirmation_and_counts() {
        let (mut app, _) = app();
        for preset in ["Mojito", "Daiquiri"] {
            app.run(Command::Create { preset: preset.to_string(), edits: edits() })
                .await
                .unwrap();
        }

        assert!(app.run(Command::Clear { yes: false }).await.is_err());
        let out = app.run(Command::Clear { yes: true }).await.unwrap();
        assert_eq!(out, "Deleted 2 creations\n");
        let out = app.run(Command::Clear { yes: true }).await.unwrap();
        assert_eq!(out, "Deleted 0 creations\n");
    }

    #[tokio::test]
    async fn test_export_all_and_delete() {
        let (mut app, store) = app();
        app.run(Command::Create { preset: "Arnold Palmer".to_string(), edits: edits() })
            .await
            .unwrap();
        let id = store.list_all().await.unwrap()[0].id;

        let out = app.run(Command::Export { ids: vec![] }).await.unwrap();
        assert!(out.contains("Name: Arnold Palmer"));

        app.run(Command::Delete { id }).await.unwrap();
        assert!(app.run(Command::Show { id, original: false }).await.is_err());
    }

    #[tokio::test]
    async fn test_unknown_rim_is_rejected_without_changing_saved_rim() {
        let (mut app, store) = app();
        let mut e = edits();
        e.rim = Some("salt".to_string());
        app.run(Command::Create { preset: "Margarita".to_string(), edits: e })
            .await
            .unwrap();
        let id = store.list_all().await.unwrap()[0].id;

        let mut e = edits();
        e.rim = Some("pepper".to_string());
        e.notes = Some("changed".to_string());
        let err = app.run(Command::Edit { id, edits: e }).await.unwrap_err();
        assert!(err.to_string().contains("unknown rim"));

        let saved = store.get(id).await.unwrap().unwrap();
        assert_eq!(saved.rim, Rim::Salt);
        assert_eq!(saved.notes, "");
    }

    #[tokio::test]
    async fn test_show_original_for_renamed_composition_is_unavailable() {
        let (mut app, store) = app();
        let mut e = edits();
        e.name = Some("Pink Fizz".to_string());
        app.run(Command::Create { preset: "Shirley Temple".to_string(), edits: e })
            .await
            .unwrap();
        let id = store.list_all().await.unwrap()[0].id;

        let out = app.run(Command::Show { id, original: true }).await.unwrap();
        assert!(out.contains("Original recipe unavailable: \"Pink Fizz\" does not name a preset"));
        assert!(!out.contains("Original Shirley Temple:"));
    }

    #[tokio::test]
    async fn test_show_original_for_preset_named_composition() {
        let (mut app, store) = app();
        app.run(Command::Create { preset: "Shirley Temple".to_string(), edits: edits() })
            .await
            .unwrap();
        let id = store.list_all().await.unwrap()[0].id;

        let out = app.run(Command::Show { id, original: true }).await.unwrap();
        assert!(out.contains("Original Shirley Temple:"));
    }
}
