//! Node registry writes shared by every ingestion path.
//!
//! A node row is created the first time any payload names it and updated on
//! every later sighting. Creation and update are a single
//! `INSERT ... ON CONFLICT (node_id)` statement against the unique index on
//! `nodes.node_id`, so concurrent first sightings of one node cannot produce
//! two rows or fail each other.

use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue::Set, ConnectionTrait, DbErr, EntityTrait, sea_query::OnConflict};

use crate::entity::nodes;

/// Fields to write on a node. `None` leaves an existing value untouched; a newly
/// created node falls back to `now` / [`nodes::DEFAULT_STATUS`] /
/// [`nodes::DEFAULT_DRIFT_STATUS`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NodeUpdate<'a> {
    pub last_seen: Option<DateTime<Utc>>,
    pub status: Option<&'a str>,
    pub drift_status: Option<&'a str>,
}

impl NodeUpdate<'_> {
    /// Sensor reading received: the node was seen at `at` and is online.
    #[must_use]
    pub fn reading(at: DateTime<Utc>) -> Self {
        Self {
            last_seen: Some(at),
            status: Some(nodes::DEFAULT_STATUS),
            drift_status: None,
        }
    }

    /// Any other message from the node: refresh `last_seen` only.
    #[must_use]
    pub fn seen(at: DateTime<Utc>) -> Self {
        Self {
            last_seen: Some(at),
            ..Self::default()
        }
    }

    fn columns(&self) -> Vec<nodes::Column> {
        let mut columns = Vec::with_capacity(3);
        if self.last_seen.is_some() {
            columns.push(nodes::Column::LastSeen);
        }
        if self.status.is_some() {
            columns.push(nodes::Column::Status);
        }
        if self.drift_status.is_some() {
            columns.push(nodes::Column::DriftStatus);
        }
        columns
    }
}

/// Create `node_id` if absent, then apply `update` to it.
///
/// Runs on whatever connection is passed in, so callers inside a transaction
/// get the write committed (or rolled back) together with their own rows.
///
/// # Errors
///
/// Returns the underlying `DbErr` if the statement fails.
pub async fn upsert_node<C: ConnectionTrait>(
    db: &C,
    node_id: &str,
    update: NodeUpdate<'_>,
) -> Result<(), DbErr> {
    let row = nodes::ActiveModel {
        node_id: Set(node_id.to_owned()),
        last_seen: Set(update.last_seen.unwrap_or_else(Utc::now)),
        status: Set(update.status.unwrap_or(nodes::DEFAULT_STATUS).to_owned()),
        drift_status: Set(update
            .drift_status
            .unwrap_or(nodes::DEFAULT_DRIFT_STATUS)
            .to_owned()),
        ..Default::default()
    };

    let columns = update.columns();
    let on_conflict = if columns.is_empty() {
        OnConflict::column(nodes::Column::NodeId)
            .do_nothing()
            .to_owned()
    } else {
        OnConflict::column(nodes::Column::NodeId)
            .update_columns(columns)
            .to_owned()
    };

    nodes::Entity::insert(row)
        .on_conflict(on_conflict)
        .exec_without_returning(db)
        .await?;

    tracing::trace!(node_id, ?update, "node_upserted");
    Ok(())
}
