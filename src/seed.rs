//! Built-in example records shown before the user has saved anything.

use crate::models::{Ingredient, Recipe};

pub fn example_recipes() -> Vec<Recipe> {
    vec![
        Recipe::new(
            "Pizza Marguerita",
            "Farinha, água, fermento, sal, molho de tomate, mussarela e manjericão.",
            "Misture farinha, água, fermento e sal para a massa. Adicione molho de tomate, \
             mussarela e manjericão. Asse em forno quente por 10 minutos.",
        )
        .with_id(1),
        Recipe::new(
            "Sushi",
            "Arroz para sushi, vinagre, algas, peixes frescos e pepino.",
            "Prepare arroz para sushi e adicione vinagre. Enrole com algas, peixes frescos e \
             vegetais de sua escolha.",
        )
        .with_id(2),
    ]
}

pub fn example_ingredients() -> Vec<Ingredient> {
    vec![
        Ingredient::new("Leite animal", "Laticínio.").with_id(1),
        Ingredient::new("Brócolis", "Vegetais.").with_id(2),
    ]
}
