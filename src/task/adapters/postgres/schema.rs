//! Diesel schema for task persistence.

diesel::table! {
    /// Tasks under review.
    tasks (id) {
        /// Task identifier.
        id -> Uuid,
        /// Task title.
        #[max_length = 255]
        title -> Varchar,
        /// Free-text description.
        description -> Text,
        /// Creating user.
        created_by -> Uuid,
        /// Reviewing leader.
        assigned_leader -> Uuid,
        /// Workflow status label.
        #[max_length = 30]
        status -> Varchar,
        /// Completion percentage.
        progress -> Int2,
        /// Last user to change progress.
        progress_by -> Uuid,
        /// Optional deadline.
        deadline -> Nullable<Timestamptz>,
        /// Creation timestamp.
        created_at -> Timestamptz,
        /// Latest change timestamp.
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Append-only audit trail of task transitions.
    task_history (id) {
        /// Entry identifier.
        id -> Uuid,
        /// Insertion order.
        sequence -> Int8,
        /// Owning task.
        task_id -> Uuid,
        /// Acting user.
        action_by -> Uuid,
        /// Recorded action.
        #[max_length = 20]
        action -> Varchar,
        /// Free-text note.
        note -> Text,
        /// Creation timestamp.
        created_at -> Timestamptz,
    }
}

diesel::joinable!(task_history -> tasks (task_id));
diesel::allow_tables_to_appear_in_same_query!(tasks, task_history);
