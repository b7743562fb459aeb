mod actor_framework;
mod app_system;
mod booking_actor;
mod clients;
mod config;
mod customer_actor;
mod domain;
mod live_view;
mod measurement_actor;
mod note_actor;
mod order_actor;
mod progress;

#[cfg(test)]
mod mock_framework;

use chrono::{Duration, NaiveTime, Utc};
use tracing::{error, info, warn, Instrument};

use crate::app_system::{setup_tracing, ShopSystem};
use crate::config::SystemConfig;
use crate::domain::{
    BookingCreate, BookingReply, BookingStatus, CustomerCreate, CustomerNoteCreate, CustomerPatch, MeasurementValues,
    NoteType, OrderCreate, OrderStatus, OrderUpdateCreate, Session, REPLY_TEMPLATES,
};
use crate::live_view::ViewState;
use crate::progress::Progress;

const VIEW_WAIT: std::time::Duration = std::time::Duration::from_secs(5);

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Dev-time overrides; a missing file is fine.
    let _ = dotenvy::from_filename(".env.local");
    let config = SystemConfig::from_env()?;
    setup_tracing(&config.log_filter);

    info!(?config, "Starting tailor order tracking");

    let system = ShopSystem::new(&config);
    let admin = Session::admin("shop_owner");

    let customer_id = system
        .customer_client
        .create_customer(&admin, CustomerCreate::new("Ada Obi", "ada@example.com"))
        .await?;
    let customer = Session::customer(customer_id.clone());
    system
        .customer_client
        .update_customer(
            &customer,
            customer_id.clone(),
            CustomerPatch { phone: Some("+234 801 234 5678".to_string()), ..Default::default() },
        )
        .await?;

    for profile in system.customer_client.list_customers(&admin).await? {
        info!(
            customer_id = %profile.id,
            name = profile.display_name(),
            phone = profile.phone.as_deref().unwrap_or("-"),
            "Customer on file"
        );
    }

    let span = tracing::info_span!("front_desk");
    async {
        let fitting = (Utc::now() + Duration::days(3)).date_naive();
        let ten_thirty = NaiveTime::from_hms_opt(10, 30, 0).unwrap_or_default();
        let booking_id = system
            .booking_client
            .create_booking(
                &customer,
                BookingCreate::new("Ada Obi", "ada@example.com", "Bespoke fitting", fitting, ten_thirty)
                    .with_notes("Bringing my own silk"),
            )
            .await?;
        let template = REPLY_TEMPLATES[0];
        let booking = system
            .booking_client
            .reply_to_booking(
                &admin,
                booking_id,
                BookingReply::new(template.text).with_status(BookingStatus::Confirmed),
            )
            .await?;
        info!(template = template.label, status = booking.status.label(), "Booking answered");
        let booking_stats = serde_json::to_string(&system.booking_client.booking_stats(&admin).await?)?;
        info!(%booking_stats, "Appointments");

        let form = [("chest", "96.5"), ("waist", "81"), ("hip", ""), ("height", "172")];
        let field = |name: &str| {
            form.iter()
                .find(|(key, _)| *key == name)
                .and_then(|(_, value)| MeasurementValues::parse_field(value))
        };
        let values = MeasurementValues {
            chest: field("chest"),
            waist: field("waist"),
            hip: field("hip"),
            height: field("height"),
            notes: Some("Prefers a relaxed fit through the shoulders".to_string()),
            ..Default::default()
        };
        system
            .measurement_client
            .upsert_measurements(&admin, customer_id.clone(), values)
            .await?;
        if let Some(own) = system
            .measurement_client
            .get_measurements(&customer, customer_id.clone())
            .await?
        {
            info!(taken = own.values.taken(), chest = ?own.values.chest, "Customer measurements");
        }

        system
            .note_client
            .add_note(
                &admin,
                CustomerNoteCreate::new("ada@example.com", "Wants mother-of-pearl buttons on everything")
                    .with_type(NoteType::Preference)
                    .with_customer_id(customer_id.clone()),
            )
            .await?;
        for note in system.note_client.list_notes(&admin, "ada@example.com".to_string()).await? {
            info!(kind = note.note_type.label(), note = %note.note, "Customer note");
        }
        Ok::<_, Box<dyn std::error::Error>>(())
    }
    .instrument(span)
    .await?;

    // The customer's order list stays fresh while the admin works.
    let mut tracking = system.order_client.watch_orders(&customer);

    let span = tracing::info_span!("order_intake");
    let order_id = async {
        info!("Recording new order");
        system
            .order_client
            .create_order(
                &admin,
                OrderCreate::new(customer_id.clone(), "Custom Silk Blouse")
                    .with_description("Ivory silk, French seams, mother-of-pearl buttons")
                    .with_estimated_completion((Utc::now() + Duration::days(14)).date_naive())
                    .with_total_amount(85000.0),
            )
            .await
    }
    .instrument(span)
    .await?;

    let span = tracing::info_span!("workshop", order_id = %order_id);
    let progressed = async {
        for (status, note) in [
            (OrderStatus::InProgress, "Pattern drafted and fabric cut"),
            (OrderStatus::Ready, "Final fitting done, ready for pickup"),
        ] {
            system
                .order_client
                .add_update(&admin, order_id.clone(), OrderUpdateCreate::new(status).with_note(note))
                .await?;
        }
        Ok::<_, order_actor::OrderError>(())
    }
    .instrument(span)
    .await;

    if let Err(e) = progressed {
        error!(error = %e, "Status update failed");
    }

    let latest = tokio::time::timeout(
        VIEW_WAIT,
        tracking.wait_for(|state| {
            state
                .ready()
                .is_some_and(|orders| orders.iter().any(|order| order.status() == OrderStatus::Ready))
        }),
    )
    .await
    .ok()
    .flatten();
    if let Some(ViewState::Ready(orders)) = latest {
        for order in &orders {
            let row = serde_json::to_value(order.row())?;
            info!(%row, updates = order.updates().len(), "Customer view");
            // Rendered from the row as it goes over the wire.
            let progress = Progress::from_raw(row["status"].as_str().unwrap_or_default());
            if progress.is_on_pipeline() {
                info!(
                    current = ?progress.current().map(|stage| stage.status),
                    percent = progress.percent_complete().unwrap_or_default() * 100.0,
                    "{}",
                    progress.render()
                );
                for stage in progress.stages().unwrap_or_default() {
                    if let Some(at) = order.reached_at(stage.status) {
                        info!(stage = stage.label, at = %at.format("%b %-d, %Y"), "Stage reached");
                    }
                }
            } else {
                warn!("{}", progress.render());
            }
        }
    }

    let mut timeline = system.order_client.watch_updates(&customer, order_id);
    let entries = tokio::time::timeout(VIEW_WAIT, timeline.wait_for(|state| !matches!(state, ViewState::Loading)))
        .await
        .ok()
        .flatten();
    match entries {
        Some(ViewState::Ready(updates)) => {
            for update in updates {
                info!(
                    status = update.status.label(),
                    note = update.note.as_deref().unwrap_or(""),
                    at = %update.created_at.format("%b %-d, %Y %-I:%M %p"),
                    "Order update"
                );
            }
        }
        Some(ViewState::Failed(reason)) => error!(%reason, "Could not load order updates"),
        _ => warn!("Order updates not loaded in time"),
    }

    let stats = system.order_client.order_stats(&admin).await?;
    let summary = serde_json::to_string(&stats)?;
    info!(%summary, active = stats.active(), "Dashboard");

    // Views still open here are stopped by shutdown.
    drop(timeline);
    system.shutdown().await?;
    drop(tracking);

    info!("Application completed successfully");
    Ok(())
}
