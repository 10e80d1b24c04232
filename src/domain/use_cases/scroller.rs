use tracing::debug;

use crate::{
    entities::{
        filters::{FilterArgs, OrderingArgs},
        image::Image,
    },
    errors::AppError,
    repositories::image::ImageRepository,
};

/// Steps through the images selected by `filter`, one at a time.
///
/// Neighbours are defined on the `(ordering field, image id)` tuple, so images sharing a
/// timestamp are still visited exactly once and in a stable order. "Next" always moves
/// towards larger tuples, whatever direction listing uses.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Scroller {
    pub filter: FilterArgs,
    pub ordering: OrderingArgs,
}

impl Scroller {
    pub fn new(filter: FilterArgs, ordering: OrderingArgs) -> Self {
        Scroller { filter, ordering }
    }

    pub async fn next_image<T>(&self, repo: &mut T, current: &Image) -> Result<Image, AppError>
    where
        T: ImageRepository + ?Sized,
    {
        self.adjacent(repo, current, false).await
    }

    pub async fn prev_image<T>(&self, repo: &mut T, current: &Image) -> Result<Image, AppError>
    where
        T: ImageRepository + ?Sized,
    {
        self.adjacent(repo, current, true).await
    }

    async fn adjacent<T>(&self, repo: &mut T, current: &Image, before: bool) -> Result<Image, AppError>
    where
        T: ImageRepository + ?Sized,
    {
        let direction = if before { "previous" } else { "next" };

        match repo
            .get_adjacent_image(current, &self.filter, &self.ordering, before)
            .await
            .map_err(|e| e.context(format!("finding {} image of {}", direction, current.id)))?
        {
            Some(image) => Ok(image),
            None => {
                debug!(image_id = %current.id, ordering = %self.ordering.field, "no {} image", direction);
                Err(AppError::NotFound(format!("no {} image for {}", direction, current.id)))
            }
        }
    }
}
