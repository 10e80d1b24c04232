//! Which labels may be applied inside a collection.
//!
//! A collection without an annotation profile accepts every label. With a profile, only
//! the profile's labels are accepted, and matching is done by label *name*.

use crate::{
    entities::{collection::Collection, label::Label},
    errors::AppError,
    repositories::{label::LabelRepository, profile::ProfileRepository},
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AllowedLabels {
    Any,
    Only(Vec<Label>),
}

impl AllowedLabels {
    pub fn permits(&self, label_name: &str) -> bool {
        match self {
            AllowedLabels::Any => true,
            AllowedLabels::Only(labels) => labels.iter().any(|l| l.name == label_name),
        }
    }
}

/// Resolves the collection's restriction. A profile label id that no longer resolves is
/// an error, never silently skipped.
pub async fn allowed_labels<T>(tx: &mut T, collection: &Collection) -> Result<AllowedLabels, AppError>
where
    T: LabelRepository + ProfileRepository + ?Sized,
{
    let Some(profile_id) = collection.profile_id else {
        return Ok(AllowedLabels::Any);
    };

    let profile = tx
        .find_profile(&profile_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("annotation profile {}", profile_id)))?;

    let mut labels = Vec::with_capacity(profile.label_ids.len());
    for label_id in &profile.label_ids {
        let label = tx
            .find_label_by_id(label_id)
            .await
            .map_err(|e| e.context(format!("resolving label {} of profile {}", label_id, profile.name)))?
            .ok_or_else(|| AppError::NotFound(format!("label {} of profile {}", label_id, profile.name)))?;
        labels.push(label);
    }

    Ok(AllowedLabels::Only(labels))
}

pub async fn available_labels<T>(tx: &mut T, collection: &Collection) -> Result<Vec<Label>, AppError>
where
    T: LabelRepository + ProfileRepository + ?Sized,
{
    match allowed_labels(tx, collection).await? {
        AllowedLabels::Any => tx.all_labels().await,
        AllowedLabels::Only(labels) => Ok(labels),
    }
}

pub async fn available_label_names<T>(tx: &mut T, collection: &Collection) -> Result<Vec<String>, AppError>
where
    T: LabelRepository + ProfileRepository + ?Sized,
{
    let labels = available_labels(tx, collection).await?;
    Ok(labels.into_iter().map(|l| l.name).collect())
}

pub async fn is_label_allowed<T>(tx: &mut T, collection: &Collection, label_name: &str) -> Result<bool, AppError>
where
    T: LabelRepository + ProfileRepository + ?Sized,
{
    let allowed = allowed_labels(tx, collection)
        .await
        .map_err(|e| e.context("checking for applicable labels"))?;
    Ok(allowed.permits(label_name))
}
