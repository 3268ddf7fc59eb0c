mod versioned_schema;

pub use versioned_schema::{
    read_schema_version, Column, ForeignKey, OnDelete, SqlType, Table, VersionedSchema,
    BASE_DB_VERSION,
};
