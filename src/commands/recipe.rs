use clap::{Args, Subcommand};

use recipebox::{KeyValueStore, Recipe, RecordId, Repository};

use super::{confirm, truncate, OutputFormat};

#[derive(Args)]
pub struct RecipeCommand {
    #[command(subcommand)]
    pub command: RecipeSubcommand,
}

#[derive(Subcommand)]
pub enum RecipeSubcommand {
    /// List all recipes
    List {
        /// Output format
        #[arg(long, short, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Show a recipe's details
    Show {
        /// Recipe ID
        id: RecordId,

        /// Output format
        #[arg(long, short, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Add a new recipe
    Add {
        /// Name of the recipe
        name: String,

        /// Ingredients, as free text
        #[arg(long)]
        ingredients: String,

        /// Step-by-step instructions
        #[arg(long)]
        steps: String,
    },

    /// Edit an existing recipe
    Edit {
        /// Recipe ID
        id: RecordId,

        /// New name
        #[arg(long)]
        name: Option<String>,

        /// New ingredients
        #[arg(long)]
        ingredients: Option<String>,

        /// New steps
        #[arg(long)]
        steps: Option<String>,
    },

    /// Delete a recipe
    Delete {
        /// Recipe ID
        id: RecordId,

        /// Skip confirmation prompt
        #[arg(long, short)]
        force: bool,
    },
}

impl RecipeCommand {
    pub async fn run<S: KeyValueStore>(
        &self,
        repo: &Repository<Recipe, S>,
    ) -> Result<(), Box<dyn std::error::Error>> {
        let recipes = repo.load().await;

        match &self.command {
            RecipeSubcommand::List { format } => {
                if recipes.is_empty() {
                    println!("No recipes found");
                    return Ok(());
                }

                match format {
                    OutputFormat::Json => {
                        println!("{}", serde_json::to_string_pretty(&recipes)?);
                    }
                    OutputFormat::Text => {
                        println!("{:<15}  {:<30}  INGREDIENTS", "ID", "NAME");
                        println!("{}", "-".repeat(80));
                        for recipe in &recipes {
                            let id = recipe.id.map(|id| id.to_string()).unwrap_or_default();
                            println!(
                                "{:<15}  {:<30}  {}",
                                id,
                                truncate(&recipe.name, 30),
                                truncate(&recipe.ingredients, 31)
                            );
                        }
                        println!("\nTotal: {} recipe(s)", recipes.len());
                    }
                }
                Ok(())
            }

            RecipeSubcommand::Show { id, format } => {
                let recipe = recipes
                    .get(*id)
                    .ok_or_else(|| format!("Recipe not found: {}", id))?;

                match format {
                    OutputFormat::Json => {
                        println!("{}", serde_json::to_string_pretty(recipe)?);
                    }
                    OutputFormat::Text => {
                        println!("{}", recipe);
                    }
                }
                Ok(())
            }

            RecipeSubcommand::Add {
                name,
                ingredients,
                steps,
            } => {
                let draft = Recipe::new(name.trim(), ingredients.trim(), steps.trim());
                let recipes = repo.upsert(draft).await?;

                if let Some(created) = recipes.as_slice().last() {
                    println!("Saved recipe:");
                    println!("{}", created);
                }
                Ok(())
            }

            RecipeSubcommand::Edit {
                id,
                name,
                ingredients,
                steps,
            } => {
                if name.is_none() && ingredients.is_none() && steps.is_none() {
                    return Err("Nothing to update. Provide at least one option.".into());
                }

                let mut draft = recipes
                    .get(*id)
                    .cloned()
                    .ok_or_else(|| format!("Recipe not found: {}", id))?;

                if let Some(name) = name {
                    draft.name = name.trim().to_string();
                }
                if let Some(ingredients) = ingredients {
                    draft.ingredients = ingredients.trim().to_string();
                }
                if let Some(steps) = steps {
                    draft.steps = steps.trim().to_string();
                }

                let recipes = repo.upsert(draft).await?;
                if let Some(updated) = recipes.get(*id) {
                    println!("Updated recipe:");
                    println!("{}", updated);
                }
                Ok(())
            }

            RecipeSubcommand::Delete { id, force } => {
                let recipe = recipes
                    .get(*id)
                    .ok_or_else(|| format!("Recipe not found: {}", id))?;

                if !force && !confirm(&format!("Delete recipe '{}'?", recipe.name))? {
                    println!("Deletion cancelled.");
                    return Ok(());
                }

                repo.remove(*id).await?;
                println!("Deleted recipe: {}", recipe.name);
                Ok(())
            }
        }
    }
}
