use tracing::{info, instrument, warn};

use crate::{
    error::AppError,
    store::{Win, WinStore},
    wins::dto::{CreateWinRequest, WinView},
};

/// Display form of a stored date.
///
/// `YYYYMMDD` becomes `MM.DD` (the year is dropped). Anything else, including
/// dates that already use a separator, is returned as stored.
pub fn display_date(raw: &str) -> String {
    if raw.len() == 8 && raw.bytes().all(|b| b.is_ascii_digit()) {
        if let (Some(month), Some(day)) = (raw.get(4..6), raw.get(6..8)) {
            return format!("{month}.{day}");
        }
    }
    raw.to_owned()
}

impl From<Win> for WinView {
    fn from(w: Win) -> Self {
        Self {
            date: display_date(&w.date),
            subject: w.desc.clone(),
            desc: w.desc,
        }
    }
}

#[instrument(skip(wins))]
pub async fn list_wins(wins: &dyn WinStore, user_id: i64) -> Result<Vec<WinView>, AppError> {
    let rows = wins.find_all_by_user(user_id).await?;
    Ok(rows.into_iter().map(WinView::from).collect())
}

/// Record a win for `user_id`. The date is stored verbatim; a missing date is
/// stored as an empty string.
#[instrument(skip(wins, req))]
pub async fn create_win(
    wins: &dyn WinStore,
    user_id: i64,
    req: &CreateWinRequest,
) -> Result<(), AppError> {
    let Some(desc) = req.description() else {
        warn!(user_id, "win without description");
        return Err(AppError::UnprocessableEntity("Description required".into()));
    };
    let date = req.date.as_deref().unwrap_or_default();

    let win = wins.create_win(user_id, date, desc).await?;
    info!(user_id, win_id = win.id, "win created");
    Ok(())
}
