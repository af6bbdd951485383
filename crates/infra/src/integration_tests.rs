//! Integration tests for the page pipeline.
//!
//! Tests: Session → RightsResolver → PageAccess → MasterPage → StoreHandler → RecordStore
//!
//! Verifies:
//! - Rights loaded for the current path gate every page action
//! - Handler failures leave page state untouched
//! - Tenant isolation is preserved in the stores

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use transerp_auth::{
        MenuNode, MenuRight, Operation, Permissions, RightsResolver, SessionManager,
    };
    use transerp_core::{MenuId, RecordId, TenantId, UserId};
    use transerp_forms::{MasterPage, PageAccess, PageError, PageMode, Severity};
    use transerp_masters::Driver;

    use crate::menu::InMemoryMenuStore;
    use crate::notify::RecordingNotifier;
    use crate::session::InMemorySessionStore;
    use crate::store::{InMemoryRecordStore, RecordStore, StoreHandler};

    type DriverStore = Arc<InMemoryRecordStore<Driver>>;
    type DriverPage = MasterPage<Driver, StoreHandler<Driver, DriverStore>>;

    struct Fixture {
        tenant: TenantId,
        menus: Arc<InMemoryMenuStore>,
        session: SessionManager,
        store: DriverStore,
        toasts: Arc<RecordingNotifier>,
    }

    fn fixture(permissions: Permissions) -> Fixture {
        let tenant = TenantId::new();
        let menus = Arc::new(InMemoryMenuStore::new());
        menus.set_menus(
            tenant,
            vec![
                MenuNode::new(1, 0, "Masters"),
                MenuNode::new(2, 1, "Drivers").with_url("/drivers"),
            ],
        );
        menus.seed_rights(
            tenant,
            vec![MenuRight::new(UserId::new(10), MenuId::new(2), permissions).with_id(1)],
        );

        Fixture {
            tenant,
            menus,
            session: SessionManager::new(Arc::new(InMemorySessionStore::new())),
            store: Arc::new(InMemoryRecordStore::new()),
            toasts: Arc::new(RecordingNotifier::new()),
        }
    }

    async fn open_page(fx: &Fixture, path: &str) -> DriverPage {
        let resolver = RightsResolver::new(fx.menus.clone());
        let access = PageAccess::load(&resolver, &fx.session, fx.tenant, path)
            .await
            .unwrap();
        let mut page = MasterPage::new(
            "Driver",
            StoreHandler::new(fx.tenant, fx.store.clone()),
            fx.toasts.clone(),
        );
        page.set_access(access);
        page.set_data_source(fx.store.get_all(fx.tenant).await.unwrap());
        page
    }

    fn fill(page: &mut DriverPage, name: &str) {
        page.change("name", name).unwrap();
        page.change("mobile", "+91 98765 43210").unwrap();
        page.change("license_number", "MH1420110062821").unwrap();
    }

    #[tokio::test]
    async fn signed_in_user_with_rights_saves_a_driver() {
        let fx = fixture(Permissions::all());
        fx.session.sign_in(UserId::new(10), "ops").await.unwrap();

        let mut page = open_page(&fx, "/drivers?tab=1").await;
        assert!(!page.access_denied());

        page.show_add_form().unwrap();
        fill(&mut page, "Ravi");
        let id = page.save().await.unwrap();

        assert_eq!(id, RecordId::new(1));
        assert_eq!(page.mode(), PageMode::Listing);
        assert_eq!(page.data_source().len(), 1);
        assert_eq!(fx.store.get_all(fx.tenant).await.unwrap().len(), 1);
        assert!(fx.store.get_all(TenantId::new()).await.unwrap().is_empty());

        let toast = fx.toasts.last().unwrap();
        assert_eq!(toast.message, "Driver saved successfully!");
        assert_eq!(toast.severity, Severity::Success);
    }

    #[tokio::test]
    async fn view_only_rights_block_mutations_before_the_store() {
        let fx = fixture(Permissions::view_only());
        fx.session.sign_in(UserId::new(10), "viewer").await.unwrap();

        let mut page = open_page(&fx, "/drivers").await;
        assert!(!page.access_denied());
        assert!(matches!(
            page.show_add_form(),
            Err(PageError::AccessDenied {
                operation: Operation::Add
            })
        ));
        assert!(fx.toasts.notifications().is_empty());
    }

    #[tokio::test]
    async fn signed_out_user_is_denied() {
        let fx = fixture(Permissions::all());
        let page = open_page(&fx, "/drivers").await;
        assert!(page.access_denied());
    }

    #[tokio::test]
    async fn store_failure_keeps_the_form_open() {
        let fx = fixture(Permissions::all());
        fx.session.sign_in(UserId::new(10), "ops").await.unwrap();
        let mut page = open_page(&fx, "/drivers").await;

        page.show_add_form().unwrap();
        fill(&mut page, "Ravi");
        fx.store.set_failing(true);

        assert!(matches!(page.save().await, Err(PageError::Handler(_))));
        assert_eq!(page.mode(), PageMode::Adding);
        assert_eq!(page.form().unwrap().record().name, "Ravi");
        assert!(page.data_source().is_empty());
        assert_eq!(fx.toasts.last().unwrap().severity, Severity::Error);
    }

    #[tokio::test]
    async fn edit_then_delete_round() {
        let fx = fixture(Permissions::all());
        fx.session.sign_in(UserId::new(10), "ops").await.unwrap();
        let mut page = open_page(&fx, "/drivers").await;

        page.show_add_form().unwrap();
        fill(&mut page, "Ravi");
        page.save().await.unwrap();

        let stored = page.data_source()[0].clone();
        page.edit_item(&stored).unwrap();
        page.change("name", "Ravi Kumar").unwrap();
        page.save().await.unwrap();
        assert_eq!(page.data_source()[0].name, "Ravi Kumar");

        let current = page.data_source()[0].clone();
        page.delete(&current).await.unwrap();
        assert!(page.data_source().is_empty());
        assert!(fx.store.get_all(fx.tenant).await.unwrap().is_empty());
        assert_eq!(
            fx.toasts.last().unwrap().message,
            "Driver deleted successfully."
        );
    }
}
