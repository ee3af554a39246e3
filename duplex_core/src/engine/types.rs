/// 盤の一辺の長さ（マス数）。
pub const BOARD_LEN: u8 = 8;

/// 下段盤のレベル値。
pub const LEVEL_LOWER: u8 = 0;

/// 上段盤のレベル値。
pub const LEVEL_UPPER: u8 = 5;

/// 1段盤変種のレベル集合。
const LEVELS_CLASSIC: [u8; 1] = [LEVEL_LOWER];

/// 2段盤変種のレベル集合。
const LEVELS_STACKED: [u8; 2] = [LEVEL_LOWER, LEVEL_UPPER];

/// 捕獲された駒の記録（ログ用）。
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct CapturedPiece {
    /// 捕獲された駒の色。
    pub color: Color,
    /// 捕獲された駒の識別子。
    pub id: PieceId,
    /// 捕獲された駒の種類。
    pub kind: PieceKind,
}

/// 手番（駒の色）。
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
#[non_exhaustive]
pub enum Color {
    /// 後手。上段側から z 減少方向へ前進する。
    Blue,
    /// 先手。下段側から z 増加方向へ前進する。
    Red,
}

impl Color {
    /// 前進方向の z 増分を返す。
    #[inline]
    #[must_use]
    pub const fn forward(self) -> i8 {
        match self {
            Self::Blue => -1_i8,
            Self::Red => 1_i8,
        }
    }

    /// 相手側の色を返す。
    #[inline]
    #[must_use]
    pub const fn opponent(self) -> Self {
        match self {
            Self::Blue => Self::Red,
            Self::Red => Self::Blue,
        }
    }
}

/// 盤面上のマス（x, z とレベルの組）。
///
/// 駒は常に暗色マス（`x + z` が奇数）にのみ存在する。
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct Coord {
    /// 盤のレベル（下段 0、上段 5）。
    pub level: u8,
    /// x 座標（0..=7）。
    pub x: u8,
    /// z 座標（0..=7）。
    pub z: u8,
}

impl Coord {
    /// 暗色マス（`x + z` が奇数）かどうかを返す。
    #[inline]
    #[must_use]
    pub const fn is_dark(self) -> bool {
        let sum = match self.x.checked_add(self.z) {
            Some(value) => value,
            None => return false,
        };
        sum % 2 == 1
    }

    /// 同一レベル上で (dx, dz) だけずらしたマスを返す（盤外なら `None`）。
    #[inline]
    #[must_use]
    pub const fn offset(self, dx: i8, dz: i8) -> Option<Self> {
        let x = match self.x.checked_add_signed(dx) {
            Some(value) => value,
            None => return None,
        };
        let z = match self.z.checked_add_signed(dz) {
            Some(value) => value,
            None => return None,
        };
        if x >= BOARD_LEN || z >= BOARD_LEN {
            return None;
        }
        Some(Self {
            level: self.level,
            x,
            z,
        })
    }
}

/// 終局の理由。
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[non_exhaustive]
pub enum EndReason {
    /// 次手番に合法手が1つも無い。
    NoLegalMoves,
    /// 指定色の駒が全滅した。
    NoPieces(Color),
}

/// 棋譜に記録されるイベント。
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[non_exhaustive]
pub enum LogEntry {
    /// 終局。
    GameEnd {
        /// 青駒の残り数。
        blue_count: u8,
        /// 終局の理由。
        reason: EndReason,
        /// 赤駒の残り数。
        red_count: u8,
        /// ゲーム全体の着手数。
        total_moves: u16,
        /// 勝者。
        winner: Color,
    },
    /// 1手の着手。
    Moved {
        /// 捕獲した駒（あれば）。
        captured: Option<CapturedPiece>,
        /// 動かした駒の色。
        color: Color,
        /// 移動元マス。
        from: Coord,
        /// 動かした駒の種類。
        kind: PieceKind,
        /// レベルジャンプだったかどうか。
        level_jump: bool,
        /// 通算の着手番号（1始まり）。
        move_number: u16,
        /// 動かした駒の識別子。
        piece: PieceId,
        /// 移動先マス。
        to: Coord,
        /// この着手でキングに昇格したかどうか。
        was_kinged: bool,
    },
    /// キングへの昇格。
    Promoted {
        /// 昇格した駒の色。
        color: Color,
        /// 昇格が起きた着手番号。
        move_number: u16,
        /// 昇格した駒の識別子。
        piece: PieceId,
        /// 昇格が起きたマス。
        square: Coord,
    },
    /// 手番の交代。
    TurnChanged {
        /// 次の手番。
        next: Color,
    },
}

/// 1つの着手候補。
///
/// 複数回の連続捕獲は、1捕獲ずつの `Capture` の列として表現する。
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[non_exhaustive]
pub enum Move {
    /// 斜め2マスのジャンプによる捕獲（捕獲は1手につき高々1駒）。
    Capture {
        /// 飛び越えて捕獲する駒の識別子。
        captured: PieceId,
        /// 着地マス。
        target: Coord,
    },
    /// 三角駒による同一 (x, z) 列のレベル間移動（捕獲なし）。
    LevelJump {
        /// 移動先マス（レベルのみ異なる）。
        target: Coord,
    },
    /// 斜め1マスの通常移動。
    Simple {
        /// 移動先マス。
        target: Coord,
    },
}

impl Move {
    /// この手が捕獲する駒の識別子を返す（捕獲手でなければ `None`）。
    #[inline]
    #[must_use]
    pub const fn captured(self) -> Option<PieceId> {
        match self {
            Self::Capture { captured, .. } => Some(captured),
            Self::LevelJump { .. } | Self::Simple { .. } => None,
        }
    }

    /// 捕獲手かどうかを返す。
    #[inline]
    #[must_use]
    pub const fn is_capture(self) -> bool {
        matches!(self, Self::Capture { .. })
    }

    /// レベルジャンプかどうかを返す。
    #[inline]
    #[must_use]
    pub const fn is_level_jump(self) -> bool {
        matches!(self, Self::LevelJump { .. })
    }

    /// 移動先マスを返す。
    #[inline]
    #[must_use]
    pub const fn target(self) -> Coord {
        match self {
            Self::Capture { target, .. }
            | Self::LevelJump { target }
            | Self::Simple { target } => target,
        }
    }
}

/// 盤上の駒。
///
/// 駒は生成後に書き換えられることはなく、局面遷移のたびに置き換えで更新される。
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct Piece {
    /// 駒の色。
    pub color: Color,
    /// 駒の識別子（初期配置時に割り当てられ、以後不変）。
    pub id: PieceId,
    /// キングかどうか（false から true へ単調に変化する）。
    pub is_king: bool,
    /// 駒の種類。
    pub kind: PieceKind,
    /// 現在のマス。
    pub pos: Coord,
}

/// 駒の識別子。
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct PieceId(
    /// 初期配置順に割り当てられる通し番号。
    u8,
);

impl PieceId {
    /// 初期配置の通し番号から識別子を生成する（crate 内部向け）。
    #[inline]
    pub(crate) const fn from_index_unchecked(index: u8) -> Self {
        Self(index)
    }

    /// 通し番号を返す。
    #[inline]
    #[must_use]
    pub const fn index(self) -> u8 {
        self.0
    }
}

/// 駒の種類。
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[non_exhaustive]
pub enum PieceKind {
    /// 通常駒。前進方向の斜め2方向にのみ動ける（キング昇格で全方向）。
    Regular,
    /// 三角駒。全斜め方向に動け、さらにレベル間を移動できる。
    Triangle,
}

/// 盤面構成（変種）。
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[non_exhaustive]
pub enum Variant {
    /// 通常の1段盤チェッカー（各色12駒）。
    Classic,
    /// 2段重ね盤チェッカー（各色 通常駒11 + 三角駒1）。
    Stacked,
}

impl Variant {
    /// 指定色の最奥段（昇格ライン）の z 座標を返す。
    #[inline]
    #[must_use]
    pub const fn far_rank(self, color: Color) -> u8 {
        match color {
            Color::Blue => u8::MIN,
            Color::Red => BOARD_LEN - 1,
        }
    }

    /// 指定色のホームレベル（昇格が成立するレベル）を返す。
    #[inline]
    #[must_use]
    pub const fn home_level(self, color: Color) -> u8 {
        match self {
            Self::Classic => LEVEL_LOWER,
            Self::Stacked => match color {
                Color::Blue => LEVEL_UPPER,
                Color::Red => LEVEL_LOWER,
            },
        }
    }

    /// この変種で存在する盤レベルの集合を返す。
    #[inline]
    #[must_use]
    pub const fn levels(self) -> &'static [u8] {
        match self {
            Self::Classic => &LEVELS_CLASSIC,
            Self::Stacked => &LEVELS_STACKED,
        }
    }

    /// 指定色の駒が `target` に着地したとき昇格するマスかどうかを返す。
    ///
    /// 昇格は「ホームレベル上の最奥段」でのみ成立する。捕獲の有無とは無関係。
    #[inline]
    #[must_use]
    pub const fn promotes_at(self, color: Color, target: Coord) -> bool {
        target.level == self.home_level(color) && target.z == self.far_rank(color)
    }
}

#[cfg(test)]
mod tests {
    use super::{BOARD_LEN, Color, Coord, LEVEL_LOWER, LEVEL_UPPER, Variant};

    #[test]
    fn coord_offset_rejects_out_of_board() {
        let corner = Coord {
            level: LEVEL_LOWER,
            x: u8::MIN,
            z: u8::MIN,
        };
        assert_eq!(corner.offset(-1_i8, 1_i8), None);
        assert_eq!(corner.offset(1_i8, -1_i8), None);

        let far = Coord {
            level: LEVEL_LOWER,
            x: BOARD_LEN - 1,
            z: BOARD_LEN - 1,
        };
        assert_eq!(far.offset(1_i8, 1_i8), None);
    }

    #[test]
    fn diagonal_offset_preserves_darkness() {
        let origin = Coord {
            level: LEVEL_LOWER,
            x: 2,
            z: 3,
        };
        assert!(origin.is_dark());

        for (dx, dz) in [(1_i8, 1_i8), (-1_i8, 1_i8), (1_i8, -1_i8), (-1_i8, -1_i8)] {
            let stepped = origin.offset(dx, dz);
            assert!(stepped.is_some(), "offset must stay on board, got={stepped:?}");
            if let Some(value) = stepped {
                assert!(value.is_dark(), "diagonal step must stay dark, got={value:?}");
            }
        }
    }

    #[test]
    fn promotion_requires_home_level_in_stacked() {
        let red_far_lower = Coord {
            level: LEVEL_LOWER,
            x: 2,
            z: BOARD_LEN - 1,
        };
        let red_far_upper = Coord {
            level: LEVEL_UPPER,
            x: 2,
            z: BOARD_LEN - 1,
        };

        assert!(Variant::Stacked.promotes_at(Color::Red, red_far_lower));
        assert!(!Variant::Stacked.promotes_at(Color::Red, red_far_upper));

        let blue_far_upper = Coord {
            level: LEVEL_UPPER,
            x: 3,
            z: u8::MIN,
        };
        assert!(Variant::Stacked.promotes_at(Color::Blue, blue_far_upper));
        assert!(!Variant::Classic.promotes_at(Color::Blue, blue_far_upper));
    }
}
