use anyhow::{bail, Result};
use reqwest::Client;

use crate::model::Workout;

/// Client-side contract of the workout service. The list view is generic
/// over this so tests can stand in an in-memory double for the HTTP client.
#[allow(async_fn_in_trait)]
pub trait WorkoutApi {
    async fn list(&self) -> Result<Vec<Workout>>;
    async fn create(&self, workout: &Workout) -> Result<Workout>;
    async fn update(&self, workout: &Workout) -> Result<Workout>;
    async fn delete(&self, id: i64) -> Result<()>;
}

pub struct WorkoutService {
    base_url: String,
    client: Client,
}

impl WorkoutService {
    pub fn new(base_url: String) -> Self {
        WorkoutService {
            base_url,
            client: Client::new(),
        }
    }
}

impl WorkoutApi for WorkoutService {
    async fn list(&self) -> Result<Vec<Workout>> {
        let url = format!("{}/workouts", self.base_url);
        let res = self.client.get(&url).send().await?;

        if !res.status().is_success() {
            bail!("Status code: {}", res.status());
        }

        Ok(res.json::<Vec<Workout>>().await?)
    }

    async fn create(&self, workout: &Workout) -> Result<Workout> {
        let url = format!("{}/workout", self.base_url);
        let res = self.client.post(&url).json(workout).send().await?;

        if !res.status().is_success() {
            bail!("Status code: {}", res.status());
        }

        Ok(res.json::<Workout>().await?)
    }

    async fn update(&self, workout: &Workout) -> Result<Workout> {
        let url = format!("{}/update_workout", self.base_url);
        let res = self.client.post(&url).json(workout).send().await?;

        if !res.status().is_success() {
            bail!("Status code: {}", res.status());
        }

        Ok(res.json::<Workout>().await?)
    }

    async fn delete(&self, id: i64) -> Result<()> {
        let url = format!("{}/delete_workout/{}", self.base_url, id);
        let res = self.client.post(&url).send().await?;

        if !res.status().is_success() {
            bail!("Status code: {}", res.status());
        }

        Ok(())
    }
}
