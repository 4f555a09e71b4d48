use crate::config::MenuConfig;
use crate::database::MenuStore;
use crate::models::{
    Folder, MenuStructure, NavItem, PropertyType, PropertyTypesByTransaction, TransactionType,
};
use crate::services::menu_cache::MenuCache;
use crate::utils::sanitize_error;
use anyhow::Result;
use chrono::Utc;
use futures::future::join_all;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

/// Cache key under which the whole assembled structure is memoized.
/// The four-way query fan-out is cached as a single unit, so a hit
/// skips every underlying query.
pub const MENU_STRUCTURE_CACHE_KEY: &str = "menu_structure";

const NEWS_BASE_PATH: &str = "/tin-tuc";
const NEWS_CATEGORY_PREFIX: &str = "/tin-tuc/danh-muc";

#[derive(Debug, Clone)]
pub struct MenuServiceOptions {
    pub cache_ttl: Duration,
    pub news_root_folder_id: i32,
}

impl Default for MenuServiceOptions {
    fn default() -> Self {
        Self {
            cache_ttl: Duration::from_secs(3600),
            news_root_folder_id: 11,
        }
    }
}

impl From<&MenuConfig> for MenuServiceOptions {
    fn from(config: &MenuConfig) -> Self {
        Self {
            cache_ttl: config.cache_ttl(),
            news_root_folder_id: config.news_root_folder_id,
        }
    }
}

/// Database-driven navigation menu generation.
///
/// Assembles the property-type taxonomies (sale/rent/project) and the
/// news folder tree into one cached structure, then transforms it into
/// the generic `NavItem` tree the rendering layer consumes. Every
/// database failure degrades rather than aborts: a single branch falls
/// back to empty, a total outage falls back to the static menu.
pub struct MenuService {
    store: Arc<dyn MenuStore>,
    cache: Arc<MenuCache<MenuStructure>>,
    options: MenuServiceOptions,
}

impl MenuService {
    pub fn new(
        store: Arc<dyn MenuStore>,
        cache: Arc<MenuCache<MenuStructure>>,
        options: MenuServiceOptions,
    ) -> Self {
        Self {
            store,
            cache,
            options,
        }
    }

    /// Property types for one transaction type, using the root-or-flat
    /// strategy: prefer active root rows (`parent_id IS NULL`); if there
    /// are none, fall back to the full flat set of active rows. This
    /// serves hierarchical taxonomies (project) and flat ones (sale,
    /// rent) through one query path, without a mode flag.
    ///
    /// Data-access failures come back as an empty list, never an error.
    pub async fn fetch_property_types(
        &self,
        transaction_type: TransactionType,
    ) -> Vec<PropertyType> {
        match self.try_fetch_property_types(transaction_type).await {
            Ok(items) => items,
            Err(err) => {
                warn!(
                    "Property type fetch failed for {:?}, serving empty list: {}",
                    transaction_type,
                    sanitize_error(&err)
                );
                Vec::new()
            }
        }
    }

    async fn try_fetch_property_types(
        &self,
        transaction_type: TransactionType,
    ) -> Result<Vec<PropertyType>> {
        let code = transaction_type.code();
        let roots = self.store.root_property_types(code).await?;

        let rows = if roots.is_empty() {
            self.store.all_property_types(code).await?
        } else {
            roots
        };

        Ok(rows.into_iter().map(PropertyType::from).collect())
    }

    /// Published sub-folders of one parent, ordered by display_order.
    /// Data-access failures come back as an empty list.
    pub async fn fetch_sub_folders(&self, parent_id: i32) -> Vec<Folder> {
        match self.store.folder_children(parent_id).await {
            Ok(rows) => rows.into_iter().map(Folder::from).collect(),
            Err(err) => {
                warn!(
                    "Sub-folder fetch failed for parent {}, serving empty list: {}",
                    parent_id,
                    sanitize_error(&err)
                );
                Vec::new()
            }
        }
    }

    /// Two-level news folder tree rooted at the configured root folder.
    /// Per-parent sub-fetches run concurrently; results are reassembled
    /// in the parents' query order. A failing sub-fetch degrades that
    /// parent only, not its siblings.
    pub async fn fetch_news_folders(&self) -> Vec<Folder> {
        match self.try_fetch_news_folders().await {
            Ok(folders) => folders,
            Err(err) => {
                warn!(
                    "News folder fetch failed, serving empty list: {}",
                    sanitize_error(&err)
                );
                Vec::new()
            }
        }
    }

    async fn try_fetch_news_folders(&self) -> Result<Vec<Folder>> {
        let parents = self
            .store
            .folder_children(self.options.news_root_folder_id)
            .await?;

        let sub_fetches = parents.iter().map(|parent| self.fetch_sub_folders(parent.id));
        let sub_folders = join_all(sub_fetches).await;

        let folders = parents
            .into_iter()
            .zip(sub_folders)
            .map(|(row, subs)| {
                let mut folder = Folder::from(row);
                if !subs.is_empty() {
                    folder.sub_folders = Some(subs);
                }
                folder
            })
            .collect();

        Ok(folders)
    }

    /// Build the composite menu structure, memoized as a unit under
    /// `MENU_STRUCTURE_CACHE_KEY`. A cache hit issues zero queries.
    pub async fn build_menu_structure(&self) -> Result<MenuStructure> {
        self.cache
            .get_or_compute(MENU_STRUCTURE_CACHE_KEY, self.options.cache_ttl, || {
                self.compute_structure()
            })
            .await
    }

    async fn compute_structure(&self) -> Result<MenuStructure> {
        let (sale, rent, project, news) = tokio::join!(
            self.try_fetch_property_types(TransactionType::Sale),
            self.try_fetch_property_types(TransactionType::Rent),
            self.try_fetch_property_types(TransactionType::Project),
            self.try_fetch_news_folders(),
        );

        // A single failing branch degrades to empty; all four failing
        // means the database is unreachable, and that must surface so
        // the caller can serve the static fallback instead of caching
        // a hollow structure.
        if sale.is_err() && rent.is_err() && project.is_err() && news.is_err() {
            anyhow::bail!("all menu queries failed, database unavailable");
        }

        let structure = MenuStructure {
            property_types: PropertyTypesByTransaction {
                sale: or_empty("sale", sale),
                rent: or_empty("rent", rent),
                project: or_empty("project", project),
            },
            news_folders: or_empty("news", news),
            generated_at: Utc::now(),
        };

        info!(
            "Menu structure built ({} sale, {} rent, {} project, {} news folders)",
            structure.property_types.sale.len(),
            structure.property_types.rent.len(),
            structure.property_types.project.len(),
            structure.news_folders.len(),
        );

        Ok(structure)
    }

    /// Full navigation tree from the cached/built structure.
    pub async fn build_main_nav(&self) -> Result<Vec<NavItem>> {
        let structure = self.build_menu_structure().await?;
        Ok(main_nav_from_structure(&structure))
    }

    /// Failure boundary for page generation: any error from the
    /// database-backed path is logged (sanitized) and answered with the
    /// static fallback menu. Never fails.
    pub async fn main_nav_items(&self) -> Vec<NavItem> {
        match self.build_main_nav().await {
            Ok(nav) => nav,
            Err(err) => {
                warn!(
                    "Menu pipeline failed, using fallback menu: {}",
                    sanitize_error(&err)
                );
                fallback_menu()
            }
        }
    }

    /// Drop all cached menu data. Test/ops hook only.
    pub fn clear_cache(&self) {
        self.cache.clear();
    }
}

fn or_empty<T>(branch: &str, result: Result<Vec<T>>) -> Vec<T> {
    match result {
        Ok(items) => items,
        Err(err) => {
            warn!(
                "Menu branch '{}' failed, serving empty branch: {}",
                branch,
                sanitize_error(&err)
            );
            Vec::new()
        }
    }
}

/// Fixed top-level skeleton interleaving static entries with the
/// database-derived subtrees. The four dynamic entries always carry a
/// `children` list, even an empty one.
pub fn main_nav_from_structure(structure: &MenuStructure) -> Vec<NavItem> {
    let property_children = |types: &[PropertyType], base_path: &str| {
        Some(
            types
                .iter()
                .map(|pt| property_type_to_nav_item(pt, base_path))
                .collect(),
        )
    };

    vec![
        NavItem {
            label: "Trang chủ".to_string(),
            href: "/".to_string(),
            children: None,
        },
        NavItem {
            label: "Mua bán".to_string(),
            href: TransactionType::Sale.base_path().to_string(),
            children: property_children(
                &structure.property_types.sale,
                TransactionType::Sale.base_path(),
            ),
        },
        NavItem {
            label: "Cho thuê".to_string(),
            href: TransactionType::Rent.base_path().to_string(),
            children: property_children(
                &structure.property_types.rent,
                TransactionType::Rent.base_path(),
            ),
        },
        NavItem {
            label: "Dự án".to_string(),
            href: TransactionType::Project.base_path().to_string(),
            children: property_children(
                &structure.property_types.project,
                TransactionType::Project.base_path(),
            ),
        },
        NavItem {
            label: "Tin tức".to_string(),
            href: NEWS_BASE_PATH.to_string(),
            children: Some(structure.news_folders.iter().map(folder_to_nav_item).collect()),
        },
        NavItem {
            label: "Liên hệ".to_string(),
            href: "/lien-he".to_string(),
            children: None,
        },
        NavItem {
            label: "Mạng lưới".to_string(),
            href: "/mang-luoi".to_string(),
            children: None,
        },
        NavItem {
            label: "Tiện ích".to_string(),
            href: "/tien-ich".to_string(),
            children: None,
        },
    ]
}

/// Transform one property type into a nav entry. The label prefers the
/// Vietnamese display label; the href slug falls back to a lowercased,
/// hyphen-joined title when no stored slug exists. No diacritic folding.
pub fn property_type_to_nav_item(pt: &PropertyType, base_path: &str) -> NavItem {
    let slug = pt
        .slug
        .as_deref()
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| fallback_slug(&pt.title));

    NavItem {
        label: pt
            .vietnamese
            .clone()
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| pt.title.clone()),
        href: format!("{}/{}", base_path, slug),
        children: None,
    }
}

/// Transform one news folder (and its sub-folders) into a nav entry.
/// The category prefix keeps folder URLs from colliding with article
/// URLs under /tin-tuc.
pub fn folder_to_nav_item(folder: &Folder) -> NavItem {
    let slug = folder
        .name
        .as_deref()
        .filter(|n| !n.is_empty())
        .map(str::to_string)
        .or_else(|| {
            folder
                .label
                .as_deref()
                .map(fallback_slug)
                .filter(|s| !s.is_empty())
        })
        .unwrap_or_default();

    let mut item = NavItem {
        label: folder
            .label
            .clone()
            .filter(|l| !l.is_empty())
            .or_else(|| folder.name.clone().filter(|n| !n.is_empty()))
            .unwrap_or_default(),
        href: format!("{}/{}", NEWS_CATEGORY_PREFIX, slug),
        children: None,
    };

    if let Some(subs) = &folder.sub_folders {
        if !subs.is_empty() {
            item.children = Some(subs.iter().map(folder_to_nav_item).collect());
        }
    }

    item
}

/// Static menu served when the database-backed path fails entirely.
/// Navigationally complete, no children on any node.
pub fn fallback_menu() -> Vec<NavItem> {
    let entries = [
        ("Trang chủ", "/"),
        ("Mua bán", "/mua-ban"),
        ("Cho thuê", "/cho-thue"),
        ("Dự án", "/du-an"),
        ("Tin tức", "/tin-tuc"),
        ("Liên hệ", "/lien-he"),
        ("Mạng lưới", "/mang-luoi"),
        ("Tiện ích", "/tien-ich"),
    ];

    entries
        .iter()
        .map(|(label, href)| NavItem {
            label: label.to_string(),
            href: href.to_string(),
            children: None,
        })
        .collect()
}

fn fallback_slug(text: &str) -> String {
    text.to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("-")
}
