use std::fmt;

use chrono::{DateTime, Utc};

use super::BookingStatus;

/// 予約期間のエラー
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PeriodError {
    /// 終了日時が開始日時より後になっていない
    EndNotAfterStart {
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    },
}

impl fmt::Display for PeriodError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PeriodError::EndNotAfterStart { start, end } => write!(
                f,
                "booking end ({}) must be after its start ({})",
                end.to_rfc3339(),
                start.to_rfc3339()
            ),
        }
    }
}

/// 予約リクエストのエラー
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestBookingError {
    /// アイテムが貸出不可に設定されている
    ItemUnavailable,
    /// 自分のアイテムは予約できない
    OwnItem,
    /// 予約期間が不正
    InvalidPeriod(PeriodError),
}

impl From<PeriodError> for RequestBookingError {
    fn from(err: PeriodError) -> Self {
        RequestBookingError::InvalidPeriod(err)
    }
}

impl fmt::Display for RequestBookingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RequestBookingError::ItemUnavailable => write!(f, "item is not available for booking"),
            RequestBookingError::OwnItem => write!(f, "cannot book own item"),
            RequestBookingError::InvalidPeriod(err) => err.fmt(f),
        }
    }
}

/// 承認・却下のエラー
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecideBookingError {
    /// WAITING以外の状態からは遷移できない
    NotWaiting(BookingStatus),
}

impl fmt::Display for DecideBookingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DecideBookingError::NotWaiting(status) => {
                write!(f, "booking is already {}", status)
            }
        }
    }
}
