use echo_nav_core::store::LocalStore;
use echo_nav_core::util::{is_http_url, normalize_text_option};
use echo_nav_core::{Category, Website};

use super::common::CliContext;
use crate::error::CliError;

#[derive(Debug, Clone, Default)]
pub struct NewWebsite {
    pub name: String,
    pub url: String,
    pub description: Option<String>,
    pub category: Option<String>,
    pub tags: Vec<String>,
    pub favorite: bool,
}

pub async fn run_add(context: &CliContext, input: NewWebsite) -> Result<(), CliError> {
    let store = context.open_store().await?;
    let website = add_website(&store, input).await?;
    println!("Added {} ({})", website.name, website.id);
    Ok(())
}

/// Validate and append a website, creating its category when missing.
pub async fn add_website<S: LocalStore>(store: &S, input: NewWebsite) -> Result<Website, CliError> {
    let name = input.name.trim();
    if name.is_empty() {
        return Err(CliError::EmptyName);
    }
    let url = input.url.trim();
    if !is_http_url(url) {
        return Err(CliError::InvalidUrl(url.to_string()));
    }

    let mut website = Website::new(name, url);
    website.description = normalize_text_option(input.description);
    website.is_favorite = input.favorite;
    website.tags = normalize_tags(input.tags);

    if let Some(category_name) = normalize_text_option(input.category) {
        let mut categories = store.load_categories().await?;
        let existing = categories
            .iter()
            .find(|category| category.name.eq_ignore_ascii_case(&category_name));
        let category_id = if let Some(category) = existing {
            category.id.clone()
        } else {
            let sort_order = i64::try_from(categories.len()).unwrap_or(i64::MAX);
            let category = Category::new(category_name, sort_order);
            let id = category.id.clone();
            categories.push(category);
            store.replace_categories(categories).await?;
            id
        };
        website.category_id = Some(category_id);
    }

    let mut websites = store.load_websites().await?;
    websites.push(website.clone());
    store.replace_websites(websites).await?;
    tracing::debug!(id = %website.id, "Website added");
    Ok(website)
}

fn normalize_tags(tags: Vec<String>) -> Vec<String> {
    let mut normalized: Vec<String> = Vec::new();
    for tag in tags {
        let tag = tag.trim().to_lowercase();
        if !tag.is_empty() && !normalized.contains(&tag) {
            normalized.push(tag);
        }
    }
    normalized
}
