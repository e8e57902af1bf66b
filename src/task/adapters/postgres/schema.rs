//! Diesel schema for task board persistence.

diesel::table! {
    /// Task records with their column position and checklist.
    tasks (id) {
        /// Task identifier.
        id -> Uuid,
        /// Owning user identifier.
        owner_id -> Uuid,
        /// Task title.
        #[max_length = 120]
        title -> Varchar,
        /// Optional description.
        description -> Nullable<Text>,
        /// Board column.
        #[max_length = 32]
        status -> Varchar,
        /// Zero-based position within the owner's column.
        position -> Int4,
        /// Priority.
        #[max_length = 16]
        priority -> Varchar,
        /// Optional planned start.
        start_at -> Nullable<Timestamptz>,
        /// Optional deadline.
        due_at -> Nullable<Timestamptz>,
        /// Checklist entries as a JSON array.
        items -> Jsonb,
        /// Completion percentage.
        percent -> Int2,
        /// Creation timestamp.
        created_at -> Timestamptz,
        /// Last update timestamp.
        updated_at -> Timestamptz,
    }
}
