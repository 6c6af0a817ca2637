use crate::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Cell {
    Background,
    Trail,
    Rocket,
    Glyph(char),
}

impl std::fmt::Display for Cell {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Cell::Background => write!(f, "{}", GLYPH_BACKGROUND),
            Cell::Trail => write!(f, "{}", GLYPH_TRAIL),
            Cell::Rocket => write!(f, "{}", GLYPH_ROCKET),
            Cell::Glyph(c) => write!(f, "{}", c),
        }
    }
}

/// The flight picture: a diagonal trail from the bottom-left corner up to
/// the rocket, with the multiplier stamped into the middle row.
/// A pure function of the multiplier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    cells: [[Cell; FIELD_WIDTH]; FIELD_HEIGHT],
}

impl Field {
    /// How far along the diagonal the rocket sits.
    pub fn reach(multiplier: Multiplier) -> usize {
        let x = (multiplier * 2.0).floor();
        if x.is_finite() && x > 0.0 {
            (x as usize).min(FIELD_WIDTH).min(FIELD_HEIGHT)
        } else {
            0
        }
    }
    pub fn rocket(&self) -> Option<(usize, usize)> {
        (0..FIELD_HEIGHT)
            .flat_map(|row| (0..FIELD_WIDTH).map(move |col| (row, col)))
            .find(|&(row, col)| self.cells[row][col] == Cell::Rocket)
    }
}

impl From<Multiplier> for Field {
    fn from(multiplier: Multiplier) -> Self {
        let mut cells = [[Cell::Background; FIELD_WIDTH]; FIELD_HEIGHT];
        let reach = Self::reach(multiplier);
        for i in 0..reach {
            cells[FIELD_HEIGHT - 1 - i][i] = Cell::Trail;
        }
        if reach > 0 {
            cells[FIELD_HEIGHT - reach][reach - 1] = Cell::Rocket;
        }
        let stamp = format!("x{:.2}", multiplier);
        let row = FIELD_HEIGHT / 2;
        let col = FIELD_WIDTH.saturating_sub(stamp.chars().count() + 1);
        stamp
            .chars()
            .take(FIELD_WIDTH - col)
            .enumerate()
            .for_each(|(i, c)| cells[row][col + i] = Cell::Glyph(c));
        Self { cells }
    }
}

impl std::fmt::Display for Field {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        for row in self.cells.iter() {
            let line = row
                .iter()
                .map(|cell| cell.to_string())
                .collect::<Vec<_>>()
                .join(" ");
            writeln!(f, "{}", line)?;
        }
        Ok(())
    }
}
