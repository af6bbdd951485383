use anyhow::Context;
use chrono::Local;

use transerp_app::{build_services, seed, AppConfig};
use transerp_invoicing::InvoiceItem;
use transerp_metadata::Amount;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::from_env()?;
    transerp_observability::init(config.log_format);

    let services = build_services(&config)
        .await
        .context("failed to build services")?;
    tracing::info!(tenant_id = %config.tenant_id, "services ready");

    services
        .session
        .sign_in(seed::ADMIN, "admin")
        .await
        .context("sign in failed")?;

    let navigation = services.navigation();
    navigation.load(&config.current_path).await?;
    for root in navigation.roots().await {
        let children: Vec<_> = navigation
            .children(root.id)
            .await
            .into_iter()
            .map(|c| c.display_name)
            .collect();
        tracing::info!(menu = %root.display_name, children = ?children, "menu");
    }

    let mut drivers = services
        .master_page("Driver", &services.drivers, "/drivers")
        .await?;
    drivers.show_add_form()?;
    drivers.change("name", "Suresh Patil")?;
    drivers.change("mobile", "+91 98200 33333")?;
    drivers.change("license_number", "MH1220190045678")?;
    let driver_id = drivers.save().await?;
    tracing::info!(driver_id = %driver_id, rows = drivers.data_source().len(), "driver added");
    println!("{}", serde_json::to_string_pretty(&drivers.rows())?);

    let mut invoices = services.invoice_page("/invoices").await?;
    invoices.show_add_form().await?;
    invoices.change("customer_id", "1")?;
    invoices.change("invoice_date", Local::now().date_naive().format("%Y-%m-%d").to_string())?;
    invoices.add_line_item(InvoiceItem::new("Mumbai to Pune freight", 2, Amount::from_minor(1_250_000), Amount::ZERO).priced()?)?;
    invoices.add_line_item(InvoiceItem::new("Loading charges", 1, Amount::from_minor(150_000), Amount::from_minor(10_000)).priced()?)?;
    let invoice_id = invoices.save().await?;

    let total = invoices
        .data_source()
        .iter()
        .find(|i| i.invoice_id == invoice_id)
        .map(|i| i.total_amount)
        .unwrap_or(Amount::ZERO);
    tracing::info!(invoice_id = %invoice_id, total = %total, "invoice saved");

    Ok(())
}
