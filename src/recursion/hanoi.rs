use super::RecursionEvent;
use crate::error::{Result, VizError};
use crate::trace::{StepKind, Trace, TraceBuilder};
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// Largest disk count accepted; a run of `n` disks has `2^(n+1) - 1` steps
pub const MAX_DISKS: u32 = 16;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Peg {
    A,
    B,
    C,
}

impl Peg {
    pub const ALL: [Peg; 3] = [Peg::A, Peg::B, Peg::C];

    fn slot(self) -> usize {
        match self {
            Peg::A => 0,
            Peg::B => 1,
            Peg::C => 2,
        }
    }
}

impl fmt::Display for Peg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Peg::A => "A",
            Peg::B => "B",
            Peg::C => "C",
        };
        f.pad(name)
    }
}

impl FromStr for Peg {
    type Err = VizError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "A" => Ok(Peg::A),
            "B" => Ok(Peg::B),
            "C" => Ok(Peg::C),
            other => Err(VizError::invalid(format!("unknown peg '{}'", other))),
        }
    }
}

/// Disk stacks in fixed A, B, C order, bottom first.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Towers {
    pegs: [Vec<u32>; 3],
}

impl Towers {
    fn stacked(n: u32, on: Peg) -> Self {
        let mut towers = Towers::default();
        towers.pegs[on.slot()] = (1..=n).rev().collect();
        towers
    }

    pub fn peg(&self, peg: Peg) -> &[u32] {
        &self.pegs[peg.slot()]
    }

    pub fn disk_count(&self) -> usize {
        self.pegs.iter().map(Vec::len).sum()
    }

    /// True when every peg holds its disks in descending order
    pub fn is_legal(&self) -> bool {
        self.pegs
            .iter()
            .all(|stack| stack.windows(2).all(|w| w[0] > w[1]))
    }

    fn move_top(&mut self, from: Peg, to: Peg) -> Result<u32> {
        let disk = self.pegs[from.slot()]
            .pop()
            .ok_or_else(|| VizError::invalid(format!("peg {} is empty", from)))?;
        self.pegs[to.slot()].push(disk);
        Ok(disk)
    }
}

/// Peg contents and move count at one step.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HanoiSnapshot {
    pub towers: Towers,
    pub move_count: u64,
    #[serde(flatten)]
    pub event: RecursionEvent,
}

impl StepKind for HanoiSnapshot {
    fn tag(&self) -> &'static str {
        self.event.tag()
    }

    fn is_terminal(&self) -> bool {
        matches!(self.event, RecursionEvent::Complete { .. })
    }
}

struct Solver {
    towers: Towers,
    move_count: u64,
    trace: TraceBuilder<HanoiSnapshot>,
}

impl Solver {
    fn emit(
        &mut self,
        event: RecursionEvent,
        message: impl Into<String>,
        highlight: impl Into<String>,
        description: impl Into<String>,
    ) {
        let snapshot = HanoiSnapshot {
            towers: self.towers.clone(),
            move_count: self.move_count,
            event,
        };
        self.trace.push(snapshot, message, highlight, description);
    }

    fn shift(&mut self, from: Peg, to: Peg) -> Result<u32> {
        let disk = self.towers.move_top(from, to)?;
        self.move_count += 1;
        Ok(disk)
    }

    fn solve(&mut self, disks: u32, src: Peg, dest: Peg, aux: Peg, depth: usize) -> Result<()> {
        if disks == 1 {
            let disk = self.shift(src, dest)?;
            self.emit(
                RecursionEvent::Move {
                    disk,
                    from: src,
                    to: dest,
                    depth,
                },
                format!("Move disk {} from {} to {}", disk, src, dest),
                format!("Base case: Move single disk {}", disk),
                format!(
                    "Direct move of smallest disk {} from {} to {}.",
                    disk, src, dest
                ),
            );
            return Ok(());
        }

        self.emit(
            RecursionEvent::RecursiveCall {
                disks: disks - 1,
                from: src,
                to: aux,
                stage: 1,
                depth,
            },
            format!("Move {} disks from {} to {}", disks - 1, src, aux),
            "Subproblem 1: Clear the way for largest disk",
            format!(
                "Stage 1: Temporarily relocate top {} disks to {}.",
                disks - 1,
                aux
            ),
        );
        self.solve(disks - 1, src, aux, dest, depth + 1)?;

        let disk = self.shift(src, dest)?;
        self.emit(
            RecursionEvent::Move {
                disk,
                from: src,
                to: dest,
                depth,
            },
            format!("Move disk {} from {} to {}", disk, src, dest),
            format!("Move largest disk {}", disk),
            format!(
                "Critical move: Largest of current stack ({}) to destination {}.",
                disk, dest
            ),
        );

        self.emit(
            RecursionEvent::RecursiveCall {
                disks: disks - 1,
                from: aux,
                to: dest,
                stage: 2,
                depth,
            },
            format!("Move {} disks from {} to {}", disks - 1, aux, dest),
            "Subproblem 2: Move disks to final destination",
            format!(
                "Stage 2: Move {} disks from {} onto {} (on top of disk {}).",
                disks - 1,
                aux,
                dest,
                disk
            ),
        );
        self.solve(disks - 1, aux, dest, src, depth + 1)
    }
}

/// Trace the optimal solution for `n` disks stacked on `source`.
pub fn tower_of_hanoi_steps(
    n: u32,
    source: Peg,
    destination: Peg,
    auxiliary: Peg,
) -> Result<Trace<HanoiSnapshot>> {
    if n == 0 {
        return Err(VizError::invalid("tower of hanoi needs at least one disk"));
    }
    if n > MAX_DISKS {
        return Err(VizError::invalid(format!(
            "{} disks is more than the supported maximum of {}",
            n, MAX_DISKS
        )));
    }
    if source == destination || source == auxiliary || destination == auxiliary {
        return Err(VizError::invalid(format!(
            "pegs must be distinct (got {}, {}, {})",
            source, destination, auxiliary
        )));
    }

    let mut solver = Solver {
        towers: Towers::stacked(n, source),
        move_count: 0,
        trace: TraceBuilder::new(),
    };

    solver.emit(
        RecursionEvent::Initial {
            disks: n,
            source,
            destination,
        },
        format!("Initial state: {} disks on tower {}", n, source),
        format!("Goal: Move all disks from {} to {}", source, destination),
        format!(
            "Start: All {} disks stacked on rod {} (largest at bottom).",
            n, source
        ),
    );

    solver.solve(n, source, destination, auxiliary, 0)?;

    let moves = solver.move_count;
    solver.emit(
        RecursionEvent::Complete {
            final_result: None,
            fib_tree: false,
        },
        format!("Puzzle solved! All disks moved to {}", destination),
        format!("Tower of Hanoi completed in {} moves", moves),
        "Finished: All disks transferred following optimal strategy.",
    );
    tracing::debug!(n, moves, "generated tower of hanoi trace");
    Ok(solver.trace.finish())
}
