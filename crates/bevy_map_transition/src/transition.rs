//! Transition value types
//!
//! A [`TransitionType`] describes, for each of the 4 corners of a tile, whether
//! that corner belongs to the outer group or to the inner group. A
//! [`Transition`] pairs a type with the two groups it separates.

use crate::TransitionError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One of the 4 corners of a tile.
/// Y-UP coordinate system: Up corners are on the +Y side
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Corner {
    UpLeft,
    UpRight,
    DownLeft,
    DownRight,
}

impl Corner {
    pub const ALL: [Corner; 4] = [
        Corner::UpLeft,
        Corner::UpRight,
        Corner::DownLeft,
        Corner::DownRight,
    ];

    /// Bit of this corner inside a transition bitmask
    pub const fn bit(self) -> u8 {
        match self {
            Corner::UpLeft => 0b0001,
            Corner::UpRight => 0b0010,
            Corner::DownLeft => 0b0100,
            Corner::DownRight => 0b1000,
        }
    }

    /// Corner position relative to the tile center, in half-tile units
    pub const fn offset(self) -> (i32, i32) {
        match self {
            Corner::UpLeft => (-1, 1),
            Corner::UpRight => (1, 1),
            Corner::DownLeft => (-1, -1),
            Corner::DownRight => (1, -1),
        }
    }

    /// Corner at a half-tile offset from the tile center, if any
    pub const fn from_offset(x: i32, y: i32) -> Option<Corner> {
        match (x, y) {
            (-1, 1) => Some(Corner::UpLeft),
            (1, 1) => Some(Corner::UpRight),
            (-1, -1) => Some(Corner::DownLeft),
            (1, -1) => Some(Corner::DownRight),
            _ => None,
        }
    }
}

/// Corner pattern of a transition tile. A set corner belongs to the outer group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransitionType {
    /// All corners inner
    Center,
    UpLeft,
    UpRight,
    DownLeft,
    DownRight,
    /// Outer group above
    Up,
    /// Outer group below
    Down,
    /// Outer group on the left
    Left,
    /// Outer group on the right
    Right,
    UpLeftDownRight,
    UpRightDownLeft,
    /// Only the up-left corner is inner
    CornerUpLeft,
    /// Only the up-right corner is inner
    CornerUpRight,
    /// Only the down-left corner is inner
    CornerDownLeft,
    /// Only the down-right corner is inner
    CornerDownRight,
    /// All corners outer
    CenterOut,
}

/// Variants indexed by their corner bitmask
const BY_BITS: [TransitionType; 16] = [
    TransitionType::Center,
    TransitionType::UpLeft,
    TransitionType::UpRight,
    TransitionType::Up,
    TransitionType::DownLeft,
    TransitionType::Left,
    TransitionType::UpRightDownLeft,
    TransitionType::CornerDownRight,
    TransitionType::DownRight,
    TransitionType::UpLeftDownRight,
    TransitionType::Right,
    TransitionType::CornerDownLeft,
    TransitionType::Down,
    TransitionType::CornerUpRight,
    TransitionType::CornerUpLeft,
    TransitionType::CenterOut,
];

impl TransitionType {
    pub const ALL: [TransitionType; 16] = BY_BITS;

    /// Find a variant by its name (e.g. "UP_LEFT")
    pub fn from_name(name: &str) -> Result<Self, TransitionError> {
        Self::ALL
            .iter()
            .find(|t| t.name() == name)
            .copied()
            .ok_or_else(|| TransitionError::UnknownTransitionName(name.to_string()))
    }

    /// Build a variant from its 4 corners (`true` = outer group)
    pub const fn from_corners(
        down_right: bool,
        down_left: bool,
        up_right: bool,
        up_left: bool,
    ) -> Self {
        let mut bits = 0;
        if up_left {
            bits |= Corner::UpLeft.bit();
        }
        if up_right {
            bits |= Corner::UpRight.bit();
        }
        if down_left {
            bits |= Corner::DownLeft.bit();
        }
        if down_right {
            bits |= Corner::DownRight.bit();
        }
        Self::from_bits(bits)
    }

    /// Variant encoded by a corner bitmask.
    ///
    /// Patterns matching no variant (bits above the 4 corners) fall back to
    /// [`TransitionType::Center`] instead of failing.
    pub const fn from_bits(bits: u8) -> Self {
        if bits as usize >= BY_BITS.len() {
            return TransitionType::Center;
        }
        BY_BITS[bits as usize]
    }

    pub const fn bits(self) -> u8 {
        match self {
            TransitionType::Center => 0b0000,
            TransitionType::UpLeft => 0b0001,
            TransitionType::UpRight => 0b0010,
            TransitionType::Up => 0b0011,
            TransitionType::DownLeft => 0b0100,
            TransitionType::Left => 0b0101,
            TransitionType::UpRightDownLeft => 0b0110,
            TransitionType::CornerDownRight => 0b0111,
            TransitionType::DownRight => 0b1000,
            TransitionType::UpLeftDownRight => 0b1001,
            TransitionType::Right => 0b1010,
            TransitionType::CornerDownLeft => 0b1011,
            TransitionType::Down => 0b1100,
            TransitionType::CornerUpRight => 0b1101,
            TransitionType::CornerUpLeft => 0b1110,
            TransitionType::CenterOut => 0b1111,
        }
    }

    /// Same pattern seen from the other group (every corner inverted)
    pub const fn symmetric(self) -> Self {
        Self::from_bits(!self.bits() & 0b1111)
    }

    /// Whether a corner belongs to the outer group
    pub const fn corner(self, corner: Corner) -> bool {
        self.bits() & corner.bit() != 0
    }

    pub const fn up_left(self) -> bool {
        self.corner(Corner::UpLeft)
    }

    pub const fn up_right(self) -> bool {
        self.corner(Corner::UpRight)
    }

    pub const fn down_left(self) -> bool {
        self.corner(Corner::DownLeft)
    }

    pub const fn down_right(self) -> bool {
        self.corner(Corner::DownRight)
    }

    /// Whether all 4 corners belong to the same group
    pub const fn is_uniform(self) -> bool {
        matches!(self, TransitionType::Center | TransitionType::CenterOut)
    }

    pub const fn name(self) -> &'static str {
        match self {
            TransitionType::Center => "CENTER",
            TransitionType::UpLeft => "UP_LEFT",
            TransitionType::UpRight => "UP_RIGHT",
            TransitionType::DownLeft => "DOWN_LEFT",
            TransitionType::DownRight => "DOWN_RIGHT",
            TransitionType::Up => "UP",
            TransitionType::Down => "DOWN",
            TransitionType::Left => "LEFT",
            TransitionType::Right => "RIGHT",
            TransitionType::UpLeftDownRight => "UP_LEFT_DOWN_RIGHT",
            TransitionType::UpRightDownLeft => "UP_RIGHT_DOWN_LEFT",
            TransitionType::CornerUpLeft => "CORNER_UP_LEFT",
            TransitionType::CornerUpRight => "CORNER_UP_RIGHT",
            TransitionType::CornerDownLeft => "CORNER_DOWN_LEFT",
            TransitionType::CornerDownRight => "CORNER_DOWN_RIGHT",
            TransitionType::CenterOut => "CENTER_OUT",
        }
    }

    /// Type a neighbor must take so that the corners it shares with a placed
    /// tile agree with that tile.
    ///
    /// `placed` and `neighbor` are both expressed with the same inner group.
    /// Each neighbor corner lying on a placed tile corner takes the placed
    /// tile's bit, every other corner keeps the neighbor's own bit.
    pub fn combine(placed: Self, neighbor: Self, offset: (i32, i32)) -> Self {
        let (dx, dy) = offset;
        let mut bits = 0;
        for corner in Corner::ALL {
            let (cx, cy) = corner.offset();
            let outer = match Corner::from_offset(2 * dx + cx, 2 * dy + cy) {
                Some(shared) => placed.corner(shared),
                None => neighbor.corner(corner),
            };
            if outer {
                bits |= corner.bit();
            }
        }
        Self::from_bits(bits)
    }
}

impl fmt::Display for TransitionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for TransitionType {
    type Err = TransitionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s)
    }
}

/// A directional pair of groups
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GroupTransition {
    pub group_in: String,
    pub group_out: String,
}

impl GroupTransition {
    pub fn new(group_in: impl Into<String>, group_out: impl Into<String>) -> Self {
        Self {
            group_in: group_in.into(),
            group_out: group_out.into(),
        }
    }

    /// Same pair traversed the other way
    pub fn reversed(&self) -> Self {
        Self::new(self.group_out.clone(), self.group_in.clone())
    }

    pub fn is_self_loop(&self) -> bool {
        self.group_in == self.group_out
    }
}

impl fmt::Display for GroupTransition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.group_in, self.group_out)
    }
}

/// A transition type between two groups.
///
/// Stored normalized so that a transition and its mirror
/// `(type.symmetric(), out, in)` are the same value: the smaller group name
/// is kept as `in`, and uniform patterns collapse onto the self-loop of the
/// group that owns every corner.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Transition {
    groups: GroupTransition,
    kind: TransitionType,
}

impl Transition {
    pub fn new(
        kind: TransitionType,
        group_in: impl Into<String>,
        group_out: impl Into<String>,
    ) -> Self {
        let mut kind = kind;
        let mut group_in = group_in.into();
        let mut group_out = group_out.into();

        if group_out < group_in {
            std::mem::swap(&mut group_in, &mut group_out);
            kind = kind.symmetric();
        }

        match kind {
            TransitionType::Center => group_out = group_in.clone(),
            TransitionType::CenterOut => {
                group_in = group_out.clone();
                kind = TransitionType::Center;
            }
            _ if group_in == group_out => kind = kind.min(kind.symmetric()),
            _ => {}
        }

        Self {
            groups: GroupTransition { group_in, group_out },
            kind,
        }
    }

    pub fn kind(&self) -> TransitionType {
        self.kind
    }

    pub fn group_in(&self) -> &str {
        &self.groups.group_in
    }

    pub fn group_out(&self) -> &str {
        &self.groups.group_out
    }

    pub fn groups(&self) -> &GroupTransition {
        &self.groups
    }

    /// Whether both sides are the same group (a plain fill tile)
    pub fn is_self_loop(&self) -> bool {
        self.groups.is_self_loop()
    }

    /// Whether this transition separates exactly `a` and `b` (in any order)
    pub fn joins(&self, a: &str, b: &str) -> bool {
        (self.group_in() == a && self.group_out() == b)
            || (self.group_in() == b && self.group_out() == a)
    }

    /// The group on the other side of `group`, if this transition touches it
    pub fn other_group(&self, group: &str) -> Option<&str> {
        if self.group_in() == group {
            Some(self.group_out())
        } else if self.group_out() == group {
            Some(self.group_in())
        } else {
            None
        }
    }

    /// The type seen with `inner` as inner group and `outer` as outer group.
    ///
    /// A self-loop of group `g` is a full tile of `g`: it reads as
    /// [`TransitionType::Center`] when `g` is inner and
    /// [`TransitionType::CenterOut`] when `g` is outer, whatever the other group.
    pub fn oriented(&self, inner: &str, outer: &str) -> Option<TransitionType> {
        if self.is_self_loop() {
            return if self.group_in() == inner {
                Some(TransitionType::Center)
            } else if self.group_in() == outer {
                Some(TransitionType::CenterOut)
            } else {
                None
            };
        }
        if self.group_in() == inner && self.group_out() == outer {
            Some(self.kind)
        } else if self.group_in() == outer && self.group_out() == inner {
            Some(self.kind.symmetric())
        } else {
            None
        }
    }
}

impl fmt::Display for Transition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.kind, self.groups)
    }
}
