// Category filter over the resolved catalog

use serde::Serialize;

use crate::models::ResolvedMediaProject;

/// The identity filter value.
pub const ALL: &str = "all";

/// Keep projects whose category equals `category` exactly; `"all"` keeps everything.
pub fn filter_by_category<'a>(projects: &'a [ResolvedMediaProject], category: &str) -> Vec<&'a ResolvedMediaProject> {
    projects
        .iter()
        .filter(|p| category == ALL || p.category() == category)
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryOption {
    pub value: String,
    pub label: String,
}

/// Filter options for a catalog: `all` first, then each distinct category in
/// first-seen order.
pub fn category_options(projects: &[ResolvedMediaProject]) -> Vec<CategoryOption> {
    let mut options = vec![CategoryOption {
        value: ALL.to_string(),
        label: "All Projects".to_string(),
    }];

    for project in projects {
        let category = project.category();
        if category.is_empty() || options.iter().any(|o| o.value == category) {
            continue;
        }
        options.push(CategoryOption {
            value: category.to_string(),
            label: label_for(category),
        });
    }

    options
}

// "data-visualization" -> "Data Visualization"
fn label_for(category: &str) -> String {
    category
        .split(['-', '_', ' '])
        .filter(|w| !w.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
