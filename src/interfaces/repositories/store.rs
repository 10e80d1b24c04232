use async_trait::async_trait;

use crate::{
    errors::AppError,
    repositories::{
        annotation::AnnotationRepository, collection::CollectionRepository, image::ImageRepository,
        label::LabelRepository, profile::ProfileRepository,
    },
};

/// Source of units of work.
#[async_trait]
pub trait Store: Send + Sync {
    type Tx: StoreTx;

    async fn begin(&self) -> Result<Self::Tx, AppError>;

    async fn check_connection(&self) -> Result<(), AppError>;
}

/// One unit of work. Every repository call made through it becomes visible together on
/// [`StoreTx::commit`]; dropping it without committing discards them all.
#[async_trait]
pub trait StoreTx:
    ImageRepository + AnnotationRepository + LabelRepository + CollectionRepository + ProfileRepository + Send + Sized
{
    async fn commit(self) -> Result<(), AppError>;
}
