use crate::sqlite_persistence::{Column, OnDelete, Table, VersionedSchema};

pub const SPOTS_TABLE: Table = Table {
    name: "spots",
    columns: &[
        Column::integer("rowid").primary_key(),
        Column::text("id").non_null(),
        Column::text("title").non_null(),
        Column::text("director").non_null(),
        Column::text("label").non_null(),
        Column::text("release_date").non_null(),
        Column::integer("duration_seconds").non_null(),
        Column::text("genre").non_null(),
        Column::integer("views").non_null().default_value("0"),
        Column::integer("comments").non_null().default_value("0"),
        Column::integer("likes").non_null().default_value("0"),
    ],
    indices: &[
        ("idx_spots_genre", "genre"),
        ("idx_spots_label", "label"),
    ],
    unique_constraints: &[&["id"]],
};

pub const PERFORMERS_TABLE: Table = Table {
    name: "performers",
    columns: &[
        Column::integer("rowid").primary_key(),
        Column::text("name").non_null(),
    ],
    indices: &[],
    unique_constraints: &[&["name"]],
};

pub const SPOT_PERFORMERS_TABLE: Table = Table {
    name: "spot_performers",
    columns: &[
        Column::integer("spot_rowid")
            .non_null()
            .references("spots", "rowid", OnDelete::Cascade),
        Column::integer("performer_rowid")
            .non_null()
            .references("performers", "rowid", OnDelete::Restrict),
        Column::integer("position").non_null().default_value("0"),
    ],
    indices: &[("idx_spot_performers_spot", "spot_rowid")],
    unique_constraints: &[],
};

pub const VIDEO_VERSIONED_SCHEMAS: &[VersionedSchema] = &[VersionedSchema {
    version: 0,
    tables: &[SPOTS_TABLE, PERFORMERS_TABLE, SPOT_PERFORMERS_TABLE],
}];
