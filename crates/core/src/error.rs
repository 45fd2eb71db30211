use thiserror::Error;

use crate::model::{ContentError, ParseIdError, ParseScreenError, SettingsError, UserError};

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    #[error(transparent)]
    Content(#[from] ContentError),
    #[error(transparent)]
    Settings(#[from] SettingsError),
    #[error(transparent)]
    User(#[from] UserError),
    #[error(transparent)]
    Id(#[from] ParseIdError),
    #[error(transparent)]
    Screen(#[from] ParseScreenError),
}
