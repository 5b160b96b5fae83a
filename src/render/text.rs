use crate::game::{GameState, Position};

const HEAD: char = '■';
const BODY: char = '□';
const FOOD: char = 'O';
const EMPTY: char = '.';

/// Plain-text snapshot of the grid inside a `#` border
///
/// One line per grid row plus the top and bottom border.
pub fn render_text(state: &GameState) -> String {
    let border = "#".repeat(state.grid_width + 2);
    let mut out = String::with_capacity((state.grid_width + 3) * (state.grid_height + 2));

    out.push_str(&border);
    out.push('\n');

    for y in 0..state.grid_height {
        out.push('#');
        for x in 0..state.grid_width {
            out.push(cell_char(state, Position::new(x as i32, y as i32)));
        }
        out.push_str("#\n");
    }

    out.push_str(&border);
    out
}

fn cell_char(state: &GameState, pos: Position) -> char {
    if pos == state.snake.head() {
        HEAD
    } else if state.is_occupied_by_snake(pos) {
        BODY
    } else if state.food == Some(pos) {
        FOOD
    } else {
        EMPTY
    }
}
