//! Repository implementations for persisted entities.

pub mod connector;

pub use connector::{
    ConnectorRow, ConnectorStore, ConnectorTx, NewConnector, SqlxConnectorStore, SqlxConnectorTx,
};
