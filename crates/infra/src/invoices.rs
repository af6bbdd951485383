//! Invoice persistence: a header store plus a line store, behind the
//! transaction page's handler contract.

use chrono::{Local, NaiveDateTime};

use transerp_core::{DomainError, Entity, RecordId, TenantId, UserId};
use transerp_forms::{HandlerError, TransactionHandler};
use transerp_invoicing::{Invoice, InvoiceItem};

use crate::store::{RecordStore, StoreError};

fn handler_error(err: DomainError) -> HandlerError {
    if let Some(msg) = err.user_message() {
        return HandlerError::rejected(msg);
    }
    match err {
        DomainError::NotFound => HandlerError::NotFound,
        other => HandlerError::storage(other.to_string()),
    }
}

/// Invoices of one tenant, saved on behalf of one user.
pub struct InvoiceBook<HS, LS> {
    tenant_id: TenantId,
    actor: UserId,
    invoices: HS,
    items: LS,
    clock: fn() -> NaiveDateTime,
}

impl<HS, LS> InvoiceBook<HS, LS>
where
    HS: RecordStore<Invoice>,
    LS: RecordStore<InvoiceItem>,
{
    pub fn new(tenant_id: TenantId, actor: UserId, invoices: HS, items: LS) -> Self {
        Self {
            tenant_id,
            actor,
            invoices,
            items,
            clock: || Local::now().naive_local(),
        }
    }

    pub fn with_clock(mut self, clock: fn() -> NaiveDateTime) -> Self {
        self.clock = clock;
        self
    }

    /// All invoices, newest invoice date first.
    pub async fn list(&self) -> Result<Vec<Invoice>, StoreError> {
        let mut all = self.invoices.get_all(self.tenant_id).await?;
        all.sort_by(|a, b| {
            b.invoice_date
                .cmp(&a.invoice_date)
                .then(b.invoice_id.cmp(&a.invoice_id))
        });
        Ok(all)
    }

    async fn items_of(&self, invoice_id: RecordId) -> Result<Vec<InvoiceItem>, StoreError> {
        let mut items: Vec<_> = self
            .items
            .get_all(self.tenant_id)
            .await?
            .into_iter()
            .filter(|item| item.invoice_id == invoice_id)
            .collect();
        items.sort_by_key(|item| item.line_item_id);
        Ok(items)
    }

    async fn drop_items(&self, invoice_id: RecordId) -> Result<(), StoreError> {
        for item in self.items_of(invoice_id).await? {
            self.items.delete(self.tenant_id, item.line_item_id).await?;
        }
        Ok(())
    }

    async fn insert_items(
        &self,
        invoice_id: RecordId,
        lines: Vec<InvoiceItem>,
    ) -> Result<(), StoreError> {
        for mut line in lines {
            line.invoice_id = invoice_id;
            line.line_item_id = RecordId::UNSAVED;
            self.items.create(self.tenant_id, line).await?;
        }
        Ok(())
    }
}

#[async_trait::async_trait]
impl<HS, LS> TransactionHandler<Invoice, InvoiceItem> for InvoiceBook<HS, LS>
where
    HS: RecordStore<Invoice>,
    LS: RecordStore<InvoiceItem>,
{
    async fn new_header(&self) -> Result<Invoice, HandlerError> {
        let last = self
            .invoices
            .get_all(self.tenant_id)
            .await?
            .iter()
            .map(Entity::id)
            .max();
        Ok(Invoice::draft((self.clock)().date(), last))
    }

    async fn lines(&self, header: &Invoice) -> Result<Vec<InvoiceItem>, HandlerError> {
        Ok(self.items_of(header.invoice_id).await?)
    }

    async fn save(
        &self,
        mut header: Invoice,
        mut lines: Vec<InvoiceItem>,
    ) -> Result<Invoice, HandlerError> {
        header
            .prepare_for_save(&mut lines, self.actor, (self.clock)())
            .map_err(handler_error)?;

        if header.is_new() {
            let stored = self.invoices.create(self.tenant_id, header).await?;
            self.insert_items(stored.invoice_id, lines).await?;
            tracing::info!(
                tenant_id = %self.tenant_id.as_uuid(),
                invoice_no = %stored.invoice_no,
                total = %stored.total_amount,
                "invoice created"
            );
            return Ok(stored);
        }

        let id = header.invoice_id;
        if !self.invoices.update(self.tenant_id, header.clone()).await? {
            return Err(HandlerError::NotFound);
        }
        self.drop_items(id).await?;
        self.insert_items(id, lines).await?;
        tracing::info!(
            tenant_id = %self.tenant_id.as_uuid(),
            invoice_no = %header.invoice_no,
            total = %header.total_amount,
            "invoice updated"
        );
        Ok(header)
    }

    async fn delete(&self, header: &Invoice) -> Result<(), HandlerError> {
        if self
            .invoices
            .get_by_id(self.tenant_id, header.invoice_id)
            .await?
            .is_none()
        {
            return Err(HandlerError::NotFound);
        }
        self.drop_items(header.invoice_id).await?;
        self.invoices.delete(self.tenant_id, header.invoice_id).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use chrono::NaiveDate;
    use transerp_invoicing::NO_CUSTOMER;
    use transerp_metadata::Amount;

    use crate::store::InMemoryRecordStore;

    type Book = InvoiceBook<Arc<InMemoryRecordStore<Invoice>>, Arc<InMemoryRecordStore<InvoiceItem>>>;

    fn noon() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 5, 2)
            .and_then(|d| d.and_hms_opt(12, 0, 0))
            .unwrap()
    }

    fn book() -> (Book, Arc<InMemoryRecordStore<InvoiceItem>>) {
        let items = Arc::new(InMemoryRecordStore::new());
        let book = InvoiceBook::new(
            TenantId::new(),
            UserId::new(3),
            Arc::new(InMemoryRecordStore::new()),
            items.clone(),
        )
        .with_clock(noon);
        (book, items)
    }

    fn line(name: &str, qty: i64, rate: i64) -> InvoiceItem {
        InvoiceItem::new(name, qty, Amount::from_major(rate).unwrap(), Amount::ZERO)
    }

    #[tokio::test]
    async fn new_header_is_numbered_from_the_last_invoice() {
        let (book, _) = book();
        let first = book.new_header().await.unwrap();
        assert_eq!(first.invoice_no, "INV-20240502-0001");
    }

    #[tokio::test]
    async fn create_stores_header_and_linked_lines() {
        let (book, _) = book();
        let mut header = book.new_header().await.unwrap();
        header.customer_id = RecordId::new(1);

        let saved = book
            .save(header, vec![line("Freight", 2, 500), line("Toll", 1, 120)])
            .await
            .unwrap();

        assert_eq!(saved.invoice_id, RecordId::new(1));
        assert_eq!(saved.total_amount, Amount::from_major(1_120).unwrap());
        assert_eq!(saved.created_by, UserId::new(3));

        let lines = book.lines(&saved).await.unwrap();
        assert_eq!(lines.len(), 2);
        assert!(lines.iter().all(|l| l.invoice_id == saved.invoice_id));
        assert_eq!(book.new_header().await.unwrap().invoice_no, "INV-20240502-0002");
    }

    #[tokio::test]
    async fn update_replaces_lines() {
        let (book, items) = book();
        let mut header = book.new_header().await.unwrap();
        header.customer_id = RecordId::new(1);
        let saved = book
            .save(header, vec![line("Freight", 2, 500), line("Toll", 1, 120)])
            .await
            .unwrap();

        let updated = book.save(saved, vec![line("Freight", 3, 500)]).await.unwrap();

        assert_eq!(updated.total_amount, Amount::from_major(1_500).unwrap());
        assert_eq!(updated.modified_by, UserId::new(3));
        assert_eq!(book.lines(&updated).await.unwrap().len(), 1);
        assert_eq!(items.get_all(book.tenant_id).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn precondition_failures_are_rejections() {
        let (book, _) = book();
        let header = book.new_header().await.unwrap();
        let err = book.save(header, vec![line("Freight", 1, 1)]).await.unwrap_err();
        assert_eq!(err, HandlerError::rejected(NO_CUSTOMER));
    }

    #[tokio::test]
    async fn delete_removes_lines_and_unknown_is_not_found() {
        let (book, items) = book();
        let mut header = book.new_header().await.unwrap();
        header.customer_id = RecordId::new(1);
        let saved = book.save(header, vec![line("Freight", 1, 10)]).await.unwrap();

        book.delete(&saved).await.unwrap();
        assert!(items.get_all(book.tenant_id).await.unwrap().is_empty());
        assert_eq!(book.delete(&saved).await.unwrap_err(), HandlerError::NotFound);
    }

    #[tokio::test]
    async fn listing_is_newest_first() {
        let (book, _) = book();
        for day in [3, 9, 5] {
            let mut header = book.new_header().await.unwrap();
            header.customer_id = RecordId::new(1);
            header.invoice_date = NaiveDate::from_ymd_opt(2024, 5, day).unwrap();
            book.save(header, vec![line("Freight", 1, 10)]).await.unwrap();
        }
        let days: Vec<_> = book
            .list()
            .await
            .unwrap()
            .into_iter()
            .map(|i| i.invoice_date.format("%d").to_string())
            .collect();
        assert_eq!(days, ["09", "05", "03"]);
    }
}
