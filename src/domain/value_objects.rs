use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// 予約ID - 予約管理コンテキストの集約ID
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BookingId(Uuid);

impl BookingId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    pub fn value(&self) -> Uuid {
        self.0
    }
}

impl Default for BookingId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for BookingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// アイテムID - アイテム管理コンテキストへの参照
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ItemId(Uuid);

impl ItemId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    pub fn value(&self) -> Uuid {
        self.0
    }
}

impl Default for ItemId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// ユーザーID - ユーザー管理コンテキストへの参照
///
/// 予約者（booker）とアイテム所有者（owner）の両方をこの型で表す。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserId(Uuid);

impl UserId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    pub fn value(&self) -> Uuid {
        self.0
    }
}

impl Default for UserId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// ページ指定エラー
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageRequestError {
    /// ページ番号が負
    NegativePage(i64),
    /// ページサイズが0以下
    NonPositiveSize(i64),
    /// ページ番号が上限（u32::MAX）を超える
    PageTooLarge(i64),
    /// ページサイズが上限（u32::MAX）を超える
    SizeTooLarge(i64),
}

impl fmt::Display for PageRequestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PageRequestError::NegativePage(page) => {
                write!(f, "page must not be negative: {}", page)
            }
            PageRequestError::NonPositiveSize(size) => {
                write!(f, "page size must be positive: {}", size)
            }
            PageRequestError::PageTooLarge(page) => {
                write!(f, "page must not exceed {}: {}", u32::MAX, page)
            }
            PageRequestError::SizeTooLarge(size) => {
                write!(f, "page size must not exceed {}: {}", u32::MAX, size)
            }
        }
    }
}

/// ページ指定（0始まりのページ番号とページサイズ）
///
/// 不変条件：page >= 0 かつ size > 0
/// 生成時に検証するため、不正なページ指定はリポジトリまで届かない。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    page: u32,
    size: u32,
}

impl PageRequest {
    /// 外部入力（符号付き整数）からページ指定を作成する
    ///
    /// # エラー
    /// - ページ番号が負の場合は`PageRequestError::NegativePage`
    /// - ページサイズが0以下の場合は`PageRequestError::NonPositiveSize`
    /// - u32に収まらない場合は`PageTooLarge` / `SizeTooLarge`
    pub fn new(page: i64, size: i64) -> Result<Self, PageRequestError> {
        if page < 0 {
            return Err(PageRequestError::NegativePage(page));
        }
        if size <= 0 {
            return Err(PageRequestError::NonPositiveSize(size));
        }
        let page = u32::try_from(page).map_err(|_| PageRequestError::PageTooLarge(page))?;
        let size = u32::try_from(size).map_err(|_| PageRequestError::SizeTooLarge(size))?;
        Ok(Self { page, size })
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn size(&self) -> u32 {
        self.size
    }

    /// 先頭からスキップする件数
    pub fn offset(&self) -> u64 {
        u64::from(self.page) * u64::from(self.size)
    }
}
