use std::collections::HashMap;

use echo_nav_core::store::LocalStore;
use echo_nav_core::{Category, Website};
use serde::Serialize;

use super::common::CliContext;
use crate::error::CliError;

#[derive(Debug, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct WebsiteListItem {
    pub id: String,
    pub name: String,
    pub url: String,
    pub category: Option<String>,
    pub tags: Vec<String>,
    pub is_favorite: bool,
}

pub async fn run_list(context: &CliContext, json: bool) -> Result<(), CliError> {
    let store = context.open_store().await?;
    let items = list_items(&store).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&items)?);
    } else if items.is_empty() {
        println!("No websites yet. Add one with `echo-nav add <NAME> <URL>`.");
    } else {
        for line in format_list_lines(&items) {
            println!("{line}");
        }
    }
    Ok(())
}

/// Websites ordered by category sort order, then name
pub async fn list_items<S: LocalStore>(store: &S) -> Result<Vec<WebsiteListItem>, CliError> {
    let websites = store.load_websites().await?;
    let categories = store.load_categories().await?;
    Ok(build_list_items(websites, &categories))
}

pub fn build_list_items(websites: Vec<Website>, categories: &[Category]) -> Vec<WebsiteListItem> {
    let by_id: HashMap<&str, &Category> = categories
        .iter()
        .map(|category| (category.id.as_str(), category))
        .collect();

    let mut websites: Vec<(Option<&Category>, Website)> = websites
        .into_iter()
        .map(|website| {
            let category = website
                .category_id
                .as_deref()
                .and_then(|id| by_id.get(id).copied());
            (category, website)
        })
        .collect();
    websites.sort_by(|(a_category, a), (b_category, b)| {
        let a_order = a_category.map_or(i64::MAX, |category| category.sort_order);
        let b_order = b_category.map_or(i64::MAX, |category| category.sort_order);
        a_order
            .cmp(&b_order)
            .then_with(|| a.name.to_lowercase().cmp(&b.name.to_lowercase()))
    });

    websites
        .into_iter()
        .map(|(category, website)| WebsiteListItem {
            id: website.id,
            name: website.name,
            url: website.url,
            category: category.map(|category| category.name.clone()),
            tags: website.tags,
            is_favorite: website.is_favorite,
        })
        .collect()
}

pub fn format_list_lines(items: &[WebsiteListItem]) -> Vec<String> {
    items
        .iter()
        .map(|item| {
            let star = if item.is_favorite { "*" } else { " " };
            let category = item
                .category
                .as_deref()
                .map(|name| format!(" [{name}]"))
                .unwrap_or_default();
            let tags = if item.tags.is_empty() {
                String::new()
            } else {
                format!(" #{}", item.tags.join(" #"))
            };
            format!("{star} {}  {}{category}{tags}", item.name, item.url)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn list_items_sort_by_category_then_name() {
        let work = Category::new("Work", 0);
        let news = Category::new("News", 1);

        let mut mail = Website::new("mail", "https://mail.example.com");
        mail.category_id = Some(work.id.clone());
        let mut board = Website::new("Board", "https://board.example.com");
        board.category_id = Some(work.id.clone());
        let mut paper = Website::new("Paper", "https://paper.example.com");
        paper.category_id = Some(news.id.clone());
        let mut orphan = Website::new("Orphan", "https://orphan.example.com");
        orphan.category_id = Some("missing".to_string());

        let items = build_list_items(vec![orphan, paper, mail, board], &[news, work]);
        let names: Vec<&str> = items.iter().map(|item| item.name.as_str()).collect();

        assert_eq!(names, vec!["Board", "mail", "Paper", "Orphan"]);
        assert_eq!(items[3].category, None);
    }

    #[test]
    fn list_lines_mark_favorites_and_tags() {
        let item = WebsiteListItem {
            id: "w1".to_string(),
            name: "Docs".to_string(),
            url: "https://docs.rs".to_string(),
            category: Some("Rust".to_string()),
            tags: vec!["rust".to_string(), "docs".to_string()],
            is_favorite: true,
        };
        assert_eq!(
            format_list_lines(&[item]),
            vec!["* Docs  https://docs.rs [Rust] #rust #docs".to_string()]
        );
    }
}
