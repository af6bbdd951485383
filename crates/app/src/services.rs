//! Composition root: stores, repositories and page factories.

use std::sync::Arc;

use sqlx::PgPool;
use thiserror::Error;

use transerp_auth::{
    MenuRepository, MenuTree, NavigationMenu, RepositoryError, ResolveError, RightsMatrix,
    RightsResolver, SessionManager,
};
use transerp_core::{Entity, TenantId, UserId};
use transerp_forms::{DropdownSources, MasterPage, Notifier, PageAccess, TransactionPage};
use transerp_infra::{
    InMemoryMenuStore, InMemoryRecordStore, InMemorySessionStore, InvoiceBook,
    PostgresMenuRepository, RecordStore, StoreError, StoreHandler, TracingNotifier,
};
use transerp_invoicing::{Invoice, InvoiceItem};
use transerp_masters::{
    Category, CategoryType, City, Company, Customer, Driver, Student, StudentAttendance, User,
    UserCategory, Vehicle,
};
use transerp_metadata::Record;

use crate::config::AppConfig;
use crate::seed;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("database connection failed: {0}")]
    Database(#[from] sqlx::Error),

    #[error(transparent)]
    Resolve(#[from] ResolveError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

pub type Store<R> = Arc<InMemoryRecordStore<R>>;
pub type Page<R> = MasterPage<R, StoreHandler<R, Store<R>>>;
pub type Invoices = InvoiceBook<Store<Invoice>, Store<InvoiceItem>>;
pub type InvoicePage = TransactionPage<Invoice, InvoiceItem, Invoices>;

pub struct AppServices {
    pub tenant_id: TenantId,
    pub menus: Arc<dyn MenuRepository>,
    pub session: Arc<SessionManager>,
    pub notifier: Arc<dyn Notifier>,
    pub drivers: Store<Driver>,
    pub vehicles: Store<Vehicle>,
    pub customers: Store<Customer>,
    pub companies: Store<Company>,
    pub cities: Store<City>,
    pub students: Store<Student>,
    pub users: Store<User>,
    pub categories: Store<Category>,
    pub category_types: Store<CategoryType>,
    pub user_categories: Store<UserCategory>,
    pub attendance: Store<StudentAttendance>,
    pub invoices: Store<Invoice>,
    pub invoice_items: Store<InvoiceItem>,
}

pub async fn build_services(config: &AppConfig) -> Result<AppServices, ServiceError> {
    let notifier: Arc<dyn Notifier> = Arc::new(TracingNotifier);

    if config.use_postgres {
        if let Some(url) = config.database_url.as_deref() {
            let pool = PgPool::connect(url).await?;
            tracing::info!("menus and rights served from Postgres");
            let menus: Arc<dyn MenuRepository> = Arc::new(PostgresMenuRepository::new(pool));
            return Ok(AppServices::with_menus(config.tenant_id, menus, notifier));
        }
        tracing::warn!("TRANSERP_USE_POSTGRES=true without DATABASE_URL, falling back to in-memory");
    }

    Ok(AppServices::in_memory(config.tenant_id, notifier))
}

impl AppServices {
    /// Fully in-memory wiring with demo menus, rights and master data.
    pub fn in_memory(tenant_id: TenantId, notifier: Arc<dyn Notifier>) -> Self {
        let menus = InMemoryMenuStore::new();
        menus.set_menus(tenant_id, seed::menus());
        menus.seed_rights(tenant_id, seed::rights());

        let mut services = Self::with_menus(tenant_id, Arc::new(menus), notifier);
        services.drivers = Arc::new(InMemoryRecordStore::with_rows(tenant_id, seed::drivers()));
        services.vehicles = Arc::new(InMemoryRecordStore::with_rows(tenant_id, seed::vehicles()));
        services.customers = Arc::new(InMemoryRecordStore::with_rows(tenant_id, seed::customers()));
        services.cities = Arc::new(InMemoryRecordStore::with_rows(tenant_id, seed::cities()));
        services.category_types =
            Arc::new(InMemoryRecordStore::with_rows(tenant_id, seed::category_types()));
        services
    }

    fn with_menus(tenant_id: TenantId, menus: Arc<dyn MenuRepository>, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            tenant_id,
            menus,
            session: Arc::new(SessionManager::new(Arc::new(InMemorySessionStore::new()))),
            notifier,
            drivers: Arc::default(),
            vehicles: Arc::default(),
            customers: Arc::default(),
            companies: Arc::default(),
            cities: Arc::default(),
            students: Arc::default(),
            users: Arc::default(),
            categories: Arc::default(),
            category_types: Arc::default(),
            user_categories: Arc::default(),
            attendance: Arc::default(),
            invoices: Arc::default(),
            invoice_items: Arc::default(),
        }
    }

    pub fn resolver(&self) -> RightsResolver<Arc<dyn MenuRepository>> {
        RightsResolver::new(self.menus.clone())
    }

    pub fn navigation(&self) -> NavigationMenu<Arc<dyn MenuRepository>> {
        NavigationMenu::new(self.tenant_id, self.resolver(), self.session.clone())
    }

    pub async fn page_access(&self, path: &str) -> Result<PageAccess, ResolveError> {
        PageAccess::load(&self.resolver(), &self.session, self.tenant_id, path).await
    }

    /// Options for the named dropdown sources used by the records.
    pub async fn dropdown_sources(&self) -> Result<DropdownSources, StoreError> {
        let customers = self
            .customers
            .get_all(self.tenant_id)
            .await?
            .into_iter()
            .filter(|c| c.is_active)
            .map(|c| c.customer_id.to_string())
            .collect();

        let students = self
            .students
            .get_all(self.tenant_id)
            .await?
            .into_iter()
            .filter(|s| s.is_active.unwrap_or(true))
            .map(|s| s.student_id.to_string())
            .collect();
        let category_types = self
            .category_types
            .get_all(self.tenant_id)
            .await?
            .into_iter()
            .map(|t| t.cat_type_id.to_string())
            .collect();

        let mut sources = DropdownSources::new();
        sources.insert("customers".to_string(), customers);
        sources.insert("students".to_string(), students);
        sources.insert("category_types".to_string(), category_types);
        sources.insert("roles".to_string(), seed::ROLES.iter().map(|r| r.to_string()).collect());
        Ok(sources)
    }

    /// Master page for `path`, with rights loaded and rows listed.
    pub async fn master_page<R>(&self, title: &str, store: &Store<R>, path: &str) -> Result<Page<R>, ServiceError>
    where
        R: Record + Entity,
    {
        let access = self.page_access(path).await?;
        let mut page = MasterPage::new(
            title,
            StoreHandler::new(self.tenant_id, store.clone()),
            self.notifier.clone(),
        )
        .with_sources(self.dropdown_sources().await?);
        page.set_access(access);
        if !page.access_denied() {
            page.set_data_source(store.get_all(self.tenant_id).await?);
        }
        Ok(page)
    }

    /// Invoice page saving on behalf of the signed-in user.
    pub async fn invoice_page(&self, path: &str) -> Result<InvoicePage, ServiceError> {
        let actor = self
            .session
            .current()
            .map(|s| s.user_id)
            .unwrap_or_default();
        let book = InvoiceBook::new(
            self.tenant_id,
            actor,
            self.invoices.clone(),
            self.invoice_items.clone(),
        );

        let access = self.page_access(path).await?;
        let listing = if access.is_denied() { Vec::new() } else { book.list().await? };

        let mut page = TransactionPage::new("Invoice", book, self.notifier.clone())
            .with_sources(self.dropdown_sources().await?);
        page.set_access(access);
        page.set_data_source(listing);
        Ok(page)
    }

    /// Rights grid of `user` over every menu, active or not.
    ///
    /// Deactivated rows are loaded too so saving updates them in place.
    pub async fn rights_matrix(&self, user: UserId) -> Result<RightsMatrix, ResolveError> {
        let tree = MenuTree::build(self.menus.all_menus(self.tenant_id).await?)?;
        let rights = self.menus.all_user_rights(self.tenant_id, user).await?;
        Ok(RightsMatrix::build(user, &tree, &rights))
    }

    /// Persist the grid in one batch; on success the grid takes the stored ids.
    pub async fn save_rights(&self, matrix: &mut RightsMatrix) -> Result<usize, RepositoryError> {
        let saved = self
            .menus
            .save_user_rights(self.tenant_id, matrix.to_rights())
            .await?;
        matrix.apply_saved(&saved);
        tracing::info!(user_id = %matrix.user_id(), rows = saved.len(), "user rights saved");
        Ok(saved.len())
    }
}
