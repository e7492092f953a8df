use anyhow::Result;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder};
use tracing::{debug, warn};

use crate::entities::{prelude::*, words};
use game_core::{is_valid_target, normalize_word};
use game_types::{Word, WordId};

pub struct WordRepository {
    db: DatabaseConnection,
}

impl WordRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    fn model_to_word(model: words::Model) -> Word {
        Word {
            id: model.id,
            text: model.word,
        }
    }

    /// Insert any of `words` not already present. Returns how many were added.
    pub async fn seed_words<S: AsRef<str>>(&self, words: &[S]) -> Result<usize> {
        let mut inserted = 0;

        for raw in words {
            let text = normalize_word(raw.as_ref());
            if !is_valid_target(&text) {
                warn!("Skipping invalid seed word '{}'", raw.as_ref());
                continue;
            }

            let existing = Words::find()
                .filter(words::Column::Word.eq(text.as_str()))
                .one(&self.db)
                .await?;
            if existing.is_some() {
                continue;
            }

            let word_model = words::ActiveModel {
                word: sea_orm::ActiveValue::Set(text),
                ..Default::default()
            };
            Words::insert(word_model).exec(&self.db).await?;
            inserted += 1;
        }

        debug!("Seeded {} new words", inserted);
        Ok(inserted)
    }

    pub async fn all_words(&self) -> Result<Vec<Word>> {
        let models = Words::find()
            .order_by_asc(words::Column::Id)
            .all(&self.db)
            .await?;

        Ok(models.into_iter().map(Self::model_to_word).collect())
    }

    pub async fn find_by_id(&self, id: WordId) -> Result<Option<Word>> {
        let word_model = Words::find_by_id(id).one(&self.db).await?;
        Ok(word_model.map(Self::model_to_word))
    }
}
