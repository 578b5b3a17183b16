//! 実行単位の作業ディレクトリ
//!
//! 比較1回ごとに独立したディレクトリを確保し、終了時に確実に
//! 片付ける。固定パスを使い回さないため、前回の残存画像が
//! 探索に紛れ込むことはない。

use std::path::{Path, PathBuf};

use crate::error::Result;

/// 比較の片側
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    A,
    B,
}

impl Side {
    /// ディレクトリ名（元データの1/2に対応）
    pub fn dir_name(&self) -> &'static str {
        match self {
            Side::A => "1",
            Side::B => "2",
        }
    }
}

/// 実行単位の作業ディレクトリ一式
///
/// drop時にディレクトリごと削除する。`keep()` で明示的に
/// 保持へ切り替えられる。
#[derive(Debug)]
pub struct RunWorkspace {
    dir: PathBuf,
    keep: bool,
}

impl RunWorkspace {
    /// `root/run-<日時>-<pid>/` を確保する
    pub fn create(root: &Path) -> Result<Self> {
        let stamp = chrono::Local::now().format("%Y%m%d-%H%M%S");
        let dir = root.join(format!("run-{}-{}", stamp, std::process::id()));

        for side in [Side::A, Side::B] {
            std::fs::create_dir_all(dir.join("uploads").join(side.dir_name()))?;
            std::fs::create_dir_all(dir.join("images").join(side.dir_name()))?;
        }

        Ok(Self { dir, keep: false })
    }

    pub fn path(&self) -> &Path {
        &self.dir
    }

    /// ZIP展開先
    pub fn upload_dir(&self, side: Side) -> PathBuf {
        self.dir.join("uploads").join(side.dir_name())
    }

    /// 抽出画像の保存先（側ごとに分離）
    pub fn image_dir(&self, side: Side) -> PathBuf {
        self.dir.join("images").join(side.dir_name())
    }

    /// drop時の削除をやめてパスを返す
    pub fn keep(mut self) -> PathBuf {
        self.keep = true;
        self.dir.clone()
    }
}

impl Drop for RunWorkspace {
    fn drop(&mut self) {
        if !self.keep {
            let _ = std::fs::remove_dir_all(&self.dir);
        }
    }
}

/// 作業ルートをまるごと削除して作り直す（メンテナンス用）
pub fn clear_root(root: &Path) -> Result<()> {
    if root.exists() {
        std::fs::remove_dir_all(root)?;
    }
    std::fs::create_dir_all(root)?;
    Ok(())
}
