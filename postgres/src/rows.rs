//! Row ↔ domain conversions.
//!
//! Counts are `INTEGER` and money/versions are `BIGINT` in the schema; values
//! that do not fit the domain types are reported as database errors rather
//! than truncated.

use sqlx::Row;
use sqlx::postgres::PgRow;
use ticketing_core::{
    Buyer, BuyerId, EmailAddress, Event, EventId, Money, StoreError, Ticket, TicketCode,
    TicketStatus, Version,
};

pub(crate) fn db_error(context: &str) -> impl Fn(sqlx::Error) -> StoreError + '_ {
    move |e| StoreError::Database(format!("{context}: {e}"))
}

fn out_of_range(column: &str) -> StoreError {
    StoreError::Database(format!("Column {column} out of range"))
}

pub(crate) fn to_u32(value: i32, column: &str) -> Result<u32, StoreError> {
    u32::try_from(value).map_err(|_| out_of_range(column))
}

pub(crate) fn to_i32(value: u32, column: &str) -> Result<i32, StoreError> {
    i32::try_from(value).map_err(|_| out_of_range(column))
}

pub(crate) fn to_u64(value: i64, column: &str) -> Result<u64, StoreError> {
    u64::try_from(value).map_err(|_| out_of_range(column))
}

pub(crate) fn to_i64(value: u64, column: &str) -> Result<i64, StoreError> {
    i64::try_from(value).map_err(|_| out_of_range(column))
}

pub(crate) fn version(value: i64) -> Result<Version, StoreError> {
    Ok(Version::new(to_u64(value, "version")?))
}

pub(crate) fn event(row: &PgRow) -> Result<Event, StoreError> {
    let read = db_error("Failed to read event row");
    Ok(Event {
        id: EventId::from_uuid(row.try_get("id").map_err(&read)?),
        name: row.try_get("name").map_err(&read)?,
        location: row.try_get("location").map_err(&read)?,
        starts_at: row.try_get("starts_at").map_err(&read)?,
        price: Money::from_minor_units(to_u64(
            row.try_get("price_minor_units").map_err(&read)?,
            "price_minor_units",
        )?),
        available_tickets: to_u32(
            row.try_get("available_tickets").map_err(&read)?,
            "available_tickets",
        )?,
        total_tickets: to_u32(row.try_get("total_tickets").map_err(&read)?, "total_tickets")?,
        version: version(row.try_get("version").map_err(&read)?)?,
    })
}

pub(crate) fn buyer(row: &PgRow) -> Result<Buyer, StoreError> {
    let read = db_error("Failed to read buyer row");
    let email: String = row.try_get("email").map_err(&read)?;
    Ok(Buyer {
        id: BuyerId::from_uuid(row.try_get("id").map_err(&read)?),
        email: EmailAddress::parse(&email)
            .map_err(|e| StoreError::Database(format!("Stored email is invalid: {e}")))?,
        name: row.try_get("name").map_err(&read)?,
        phone: row.try_get("phone").map_err(&read)?,
        created_at: row.try_get("created_at").map_err(&read)?,
    })
}

pub(crate) fn status(value: &str) -> Result<TicketStatus, StoreError> {
    TicketStatus::parse(value)
        .ok_or_else(|| StoreError::Database(format!("Unknown ticket status: {value}")))
}

pub(crate) fn ticket(row: &PgRow) -> Result<Ticket, StoreError> {
    let read = db_error("Failed to read ticket row");
    let status_text: String = row.try_get("status").map_err(&read)?;
    Ok(Ticket {
        code: TicketCode::new(row.try_get::<String, _>("code").map_err(&read)?),
        event_id: EventId::from_uuid(row.try_get("event_id").map_err(&read)?),
        buyer_id: BuyerId::from_uuid(row.try_get("buyer_id").map_err(&read)?),
        quantity: to_u32(row.try_get("quantity").map_err(&read)?, "quantity")?,
        total_price: Money::from_minor_units(to_u64(
            row.try_get("total_price_minor_units").map_err(&read)?,
            "total_price_minor_units",
        )?),
        purchased_at: row.try_get("purchased_at").map_err(&read)?,
        status: status(&status_text)?,
    })
}
