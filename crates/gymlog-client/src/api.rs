//! Named domain operations.
//!
//! Each operation is a fixed mapping onto one GET or POST call. The action
//! tags are the backend's wire contract and must not change. Payloads and
//! results stay as opaque JSON: the backend owns their shape.

use crate::gateway::Gateway;
use gymlog_core::error::Result;
use serde_json::{Value, json};

impl Gateway {
    /// Lists all exercises, built-in and user-defined.
    pub async fn list_exercises(&self) -> Result<Value> {
        self.get("getExercises", &[]).await
    }

    /// Adds a user-defined exercise.
    pub async fn add_exercise(&self, exercise: Value) -> Result<Value> {
        self.post("addExercise", json!({ "exercise": exercise })).await
    }

    /// Records a single set.
    pub async fn record_workout(&self, workout: Value) -> Result<Value> {
        self.post("addWorkout", json!({ "workout": workout })).await
    }

    /// Records a whole training session of sets at once.
    pub async fn record_workouts(&self, workouts: Value) -> Result<Value> {
        self.post("addWorkouts", json!({ "workouts": workouts })).await
    }

    /// Fetches workout history, optionally bounded by dates
    /// (`YYYY-MM-DD` strings). An absent bound is omitted from the request.
    pub async fn workout_history(
        &self,
        start_date: Option<&str>,
        end_date: Option<&str>,
    ) -> Result<Value> {
        self.get(
            "getWorkouts",
            &[
                ("startDate", start_date.map(str::to_string)),
                ("endDate", end_date.map(str::to_string)),
            ],
        )
        .await
    }

    /// Deletes one workout record.
    pub async fn delete_workout(&self, id: &str) -> Result<Value> {
        self.post("deleteWorkout", json!({ "id": id })).await
    }

    /// Fetches per-exercise statistics.
    pub async fn exercise_stats(&self, exercise_id: &str) -> Result<Value> {
        self.get("getStats", &[("exerciseId", Some(exercise_id.to_string()))])
            .await
    }

    /// Fetches body measurement history, optionally bounded by dates.
    pub async fn body_metric_history(
        &self,
        start_date: Option<&str>,
        end_date: Option<&str>,
    ) -> Result<Value> {
        self.get(
            "getBodyMetrics",
            &[
                ("startDate", start_date.map(str::to_string)),
                ("endDate", end_date.map(str::to_string)),
            ],
        )
        .await
    }

    /// Records a body measurement.
    pub async fn add_body_metric(&self, metric: Value) -> Result<Value> {
        self.post("addBodyMetric", json!({ "metric": metric })).await
    }

    /// Deletes one body measurement.
    pub async fn delete_body_metric(&self, id: &str) -> Result<Value> {
        self.post("deleteBodyMetric", json!({ "id": id })).await
    }
}
