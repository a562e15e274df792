//! Order repository: CRUD operations for the `orders` table.

use chrono::NaiveDate;
use rusqlite::{params, Connection, OptionalExtension, Row};

use super::DatabaseError;
use crate::model::{Order, OrderDetails, OrderState};

const DATE_FORMAT: &str = "%Y-%m-%d";

fn parse_state(s: &str, order_number: &str) -> OrderState {
    OrderState::parse(s).unwrap_or_else(|| {
        log::warn!(
            "Unknown order state '{}' for order {}, defaulting to PENDING",
            s,
            order_number
        );
        OrderState::Pending
    })
}

fn parse_date(s: Option<String>, order_number: &str) -> Option<NaiveDate> {
    let s = s?;
    match NaiveDate::parse_from_str(&s, DATE_FORMAT) {
        Ok(date) => Some(date),
        Err(e) => {
            log::warn!(
                "Ignoring unparsable date '{}' on order {}: {}",
                s,
                order_number,
                e
            );
            None
        }
    }
}

fn format_date(date: Option<NaiveDate>) -> Option<String> {
    date.map(|d| d.format(DATE_FORMAT).to_string())
}

fn order_from_row(row: &Row<'_>) -> Result<Order, rusqlite::Error> {
    let order_number: String = row.get("order_number")?;
    let state: String = row.get("order_state")?;
    let date: Option<String> = row.get("date")?;

    Ok(Order {
        id: row.get("id")?,
        details: OrderDetails {
            ordering_store: row.get("ordering_store")?,
            delivery_address: row.get("delivery_address")?,
            customer_name: row.get("customer_name")?,
            customer_tel: row.get("customer_tel")?,
            customer_email: row.get("customer_email")?,
            customer_address: row.get("customer_address")?,
            order_detail: row.get("order_detail")?,
            amount: row.get("amount")?,
            date: parse_date(date, &order_number),
        },
        current_station_id: row.get("current_station_id")?,
        current_station: row.get("current_station")?,
        order_state: parse_state(&state, &order_number),
        is_blocked: row.get("is_blocked")?,
        block_reason: row.get("block_reason")?,
        order_number,
    })
}

/// Inserts a new order and returns its assigned ID. `order.id` is ignored.
pub fn insert(conn: &Connection, order: &Order) -> Result<i64, DatabaseError> {
    let d = &order.details;
    conn.execute(
        "INSERT INTO orders (order_number, ordering_store, delivery_address, customer_name,
         customer_tel, customer_email, customer_address, order_detail, amount, date,
         current_station_id, current_station, order_state, is_blocked, block_reason)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15)",
        params![
            order.order_number,
            d.ordering_store,
            d.delivery_address,
            d.customer_name,
            d.customer_tel,
            d.customer_email,
            d.customer_address,
            d.order_detail,
            d.amount,
            format_date(d.date),
            order.current_station_id,
            order.current_station,
            order.order_state.as_str(),
            order.is_blocked,
            order.block_reason,
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

/// Updates an existing order. All fields except `id` and `order_number` are
/// overwritten. Returns `false` if no row matched.
pub fn update(conn: &Connection, order: &Order) -> Result<bool, DatabaseError> {
    let d = &order.details;
    let changed = conn.execute(
        "UPDATE orders SET ordering_store=?2, delivery_address=?3, customer_name=?4,
         customer_tel=?5, customer_email=?6, customer_address=?7, order_detail=?8,
         amount=?9, date=?10, current_station_id=?11, current_station=?12,
         order_state=?13, is_blocked=?14, block_reason=?15
         WHERE id=?1",
        params![
            order.id,
            d.ordering_store,
            d.delivery_address,
            d.customer_name,
            d.customer_tel,
            d.customer_email,
            d.customer_address,
            d.order_detail,
            d.amount,
            format_date(d.date),
            order.current_station_id,
            order.current_station,
            order.order_state.as_str(),
            order.is_blocked,
            order.block_reason,
        ],
    )?;
    Ok(changed > 0)
}

/// Finds an order by its ID.
pub fn find_by_id(conn: &Connection, id: i64) -> Result<Option<Order>, DatabaseError> {
    let order = conn
        .query_row(
            "SELECT * FROM orders WHERE id = ?1",
            params![id],
            order_from_row,
        )
        .optional()?;
    Ok(order)
}

/// Finds an order by its business key.
pub fn find_by_number(
    conn: &Connection,
    order_number: &str,
) -> Result<Option<Order>, DatabaseError> {
    let order = conn
        .query_row(
            "SELECT * FROM orders WHERE order_number = ?1",
            params![order_number],
            order_from_row,
        )
        .optional()?;
    Ok(order)
}

/// Returns every order in ID order.
pub fn find_all(conn: &Connection) -> Result<Vec<Order>, DatabaseError> {
    let mut stmt = conn.prepare("SELECT * FROM orders ORDER BY id ASC")?;
    let rows = stmt
        .query_map([], order_from_row)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(rows)
}

/// Returns orders whose date lies in the inclusive range. A missing bound is
/// open; with any bound present, undated orders are excluded.
pub fn find_in_date_range(
    conn: &Connection,
    from: Option<NaiveDate>,
    to: Option<NaiveDate>,
) -> Result<Vec<Order>, DatabaseError> {
    let mut conditions = Vec::new();
    let mut param_values: Vec<Box<dyn rusqlite::types::ToSql>> = Vec::new();

    if let Some(from) = format_date(from) {
        conditions.push(format!("date >= ?{}", param_values.len() + 1));
        param_values.push(Box::new(from));
    }
    if let Some(to) = format_date(to) {
        conditions.push(format!("date <= ?{}", param_values.len() + 1));
        param_values.push(Box::new(to));
    }

    let where_clause = if conditions.is_empty() {
        String::new()
    } else {
        format!("WHERE {}", conditions.join(" AND "))
    };

    let sql = format!("SELECT * FROM orders {} ORDER BY id ASC", where_clause);
    let params_ref: Vec<&dyn rusqlite::types::ToSql> =
        param_values.iter().map(|p| p.as_ref()).collect();
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt
        .query_map(params_ref.as_slice(), order_from_row)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(rows)
}

/// Returns whether an order with this ID exists.
pub fn exists(conn: &Connection, id: i64) -> Result<bool, DatabaseError> {
    let count: u64 = conn.query_row(
        "SELECT COUNT(*) FROM orders WHERE id = ?1",
        params![id],
        |r| r.get(0),
    )?;
    Ok(count > 0)
}

/// Deletes order `id`. Returns `false` if no row matched.
pub fn delete(conn: &Connection, id: i64) -> Result<bool, DatabaseError> {
    let changed = conn.execute("DELETE FROM orders WHERE id = ?1", params![id])?;
    Ok(changed > 0)
}

/// Counts orders whose station pointer references `station_id`.
pub fn count_at_station(conn: &Connection, station_id: i64) -> Result<u64, DatabaseError> {
    let count: u64 = conn.query_row(
        "SELECT COUNT(*) FROM orders WHERE current_station_id = ?1",
        params![station_id],
        |r| r.get(0),
    )?;
    Ok(count)
}

/// Rewrites the station label of every order pointing at `station_id`.
/// Returns the number of orders touched.
pub fn relabel_station(
    conn: &Connection,
    station_id: i64,
    label: &str,
) -> Result<usize, DatabaseError> {
    let changed = conn.execute(
        "UPDATE orders SET current_station = ?2 WHERE current_station_id = ?1",
        params![station_id, label],
    )?;
    Ok(changed)
}
