use rand::Rng;
use rand::seq::SliceRandom;

use crate::error::IdxError;
use crate::idx::images::IdxImageSet;
use crate::idx::labels::IdxLabelSet;

/// An image set together with the label set describing it, e.g.
/// `train-images-idx3-ubyte` + `train-labels-idx1-ubyte`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabeledImages {
    images: IdxImageSet,
    labels: IdxLabelSet,
}

impl LabeledImages {
    /// Pairs the two sets; their counts must agree.
    pub fn new(images: IdxImageSet, labels: IdxLabelSet) -> Result<Self, IdxError> {
        if images.count() != labels.count() {
            return Err(IdxError::CountMismatch {
                images: images.count() as usize,
                labels: labels.count() as usize,
            });
        }
        Ok(LabeledImages { images, labels })
    }

    pub fn images(&self) -> &IdxImageSet {
        &self.images
    }

    pub fn labels(&self) -> &IdxLabelSet {
        &self.labels
    }

    pub fn len(&self) -> usize {
        self.labels.count() as usize
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The `index`-th sample as `(pixels, label)`.
    pub fn get(&self, index: usize) -> Option<(&[u8], u8)> {
        let label = *self.labels.labels().get(index)?;
        Some((self.images.image(index)?, label))
    }

    pub fn into_parts(self) -> (IdxImageSet, IdxLabelSet) {
        (self.images, self.labels)
    }

    /// Sample indices in random order, for one pass of a resampling loop.
    pub fn shuffled_indices<R: Rng + ?Sized>(&self, rng: &mut R) -> Vec<usize> {
        let mut indices: Vec<usize> = (0..self.len()).collect();
        indices.shuffle(rng);
        indices
    }

    /// Converts the pair into `(inputs, labels)` for a training loop.
    ///
    /// - `inputs[i]` has `rows * cols` pixels scaled to `[0.0, 1.0]`.
    /// - `labels[i]` is one-hot with length `n_classes`.
    pub fn to_training_data(
        &self,
        n_classes: usize,
    ) -> Result<(Vec<Vec<f64>>, Vec<Vec<f64>>), IdxError> {
        if n_classes < 2 {
            return Err(IdxError::TooFewClasses(n_classes));
        }

        let mut labels: Vec<Vec<f64>> = Vec::with_capacity(self.len());
        for (index, &class) in self.labels.labels().iter().enumerate() {
            if class as usize >= n_classes {
                return Err(IdxError::ClassOutOfRange { index, class, n_classes });
            }
            let mut one_hot = vec![0.0f64; n_classes];
            one_hot[class as usize] = 1.0;
            labels.push(one_hot);
        }

        let inputs: Vec<Vec<f64>> = (0..self.len())
            .map(|i| {
                self.images
                    .image(i)
                    .unwrap_or_default()
                    .iter()
                    .map(|&px| px as f64 / 255.0)
                    .collect()
            })
            .collect();

        Ok((inputs, labels))
    }
}
