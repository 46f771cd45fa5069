use clap::{Args, Subcommand};

use recipebox::{Ingredient, KeyValueStore, RecordId, Repository};

use super::{confirm, truncate, OutputFormat};

#[derive(Args)]
pub struct IngredientCommand {
    #[command(subcommand)]
    pub command: IngredientSubcommand,
}

#[derive(Subcommand)]
pub enum IngredientSubcommand {
    /// List ingredients
    List {
        /// Only show ingredients in this category (case-insensitive)
        #[arg(long)]
        category: Option<String>,

        /// Output format
        #[arg(long, short, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Add a new ingredient
    Add {
        /// Name of the ingredient
        name: String,

        /// Category, e.g. "Grains"
        #[arg(long)]
        category: String,
    },

    /// Edit an existing ingredient
    Edit {
        /// Ingredient ID
        id: RecordId,

        /// New name
        #[arg(long)]
        name: Option<String>,

        /// New category
        #[arg(long)]
        category: Option<String>,
    },

    /// Delete an ingredient
    Delete {
        /// Ingredient ID
        id: RecordId,

        /// Skip confirmation prompt
        #[arg(long, short)]
        force: bool,
    },
}

impl IngredientCommand {
    pub async fn run<S: KeyValueStore>(
        &self,
        repo: &Repository<Ingredient, S>,
    ) -> Result<(), Box<dyn std::error::Error>> {
        let ingredients = repo.load().await;

        match &self.command {
            IngredientSubcommand::List { category, format } => {
                let ingredients: Vec<&Ingredient> = match category {
                    Some(category) => ingredients
                        .iter()
                        .filter(|i| i.in_category(category))
                        .collect(),
                    None => ingredients.iter().collect(),
                };

                if ingredients.is_empty() {
                    println!("No ingredients found");
                    return Ok(());
                }

                match format {
                    OutputFormat::Json => {
                        println!("{}", serde_json::to_string_pretty(&ingredients)?);
                    }
                    OutputFormat::Text => {
                        println!("{:<15}  {:<30}  CATEGORY", "ID", "NAME");
                        println!("{}", "-".repeat(70));
                        for ingredient in &ingredients {
                            let id = ingredient.id.map(|id| id.to_string()).unwrap_or_default();
                            println!(
                                "{:<15}  {:<30}  {}",
                                id,
                                truncate(&ingredient.name, 30),
                                ingredient.category
                            );
                        }
                        println!("\nTotal: {} ingredient(s)", ingredients.len());
                    }
                }
                Ok(())
            }

            IngredientSubcommand::Add { name, category } => {
                let draft = Ingredient::new(name.trim(), category.trim());
                let ingredients = repo.upsert(draft).await?;

                if let Some(created) = ingredients.as_slice().last() {
                    println!("Saved ingredient:");
                    println!("{}", created);
                }
                Ok(())
            }

            IngredientSubcommand::Edit { id, name, category } => {
                if name.is_none() && category.is_none() {
                    return Err("Nothing to update. Provide at least one option.".into());
                }

                let mut draft = ingredients
                    .get(*id)
                    .cloned()
                    .ok_or_else(|| format!("Ingredient not found: {}", id))?;

                if let Some(name) = name {
                    draft.name = name.trim().to_string();
                }
                if let Some(category) = category {
                    draft.category = category.trim().to_string();
                }

                let ingredients = repo.upsert(draft).await?;
                if let Some(updated) = ingredients.get(*id) {
                    println!("Updated ingredient:");
                    println!("{}", updated);
                }
                Ok(())
            }

            IngredientSubcommand::Delete { id, force } => {
                let ingredient = ingredients
                    .get(*id)
                    .ok_or_else(|| format!("Ingredient not found: {}", id))?;

                if !force && !confirm(&format!("Delete ingredient '{}'?", ingredient.name))? {
                    println!("Deletion cancelled.");
                    return Ok(());
                }

                repo.remove(*id).await?;
                println!("Deleted ingredient: {}", ingredient.name);
                Ok(())
            }
        }
    }
}
