// Plain-text rendering of a tower for the terminal player.
//
// Each slot row is drawn across all three pegs, top slot first. A block of
// width `w` is `2w - 1` cells wide, centered on its peg; an empty slot shows
// the bare peg as `|`. Blocks are filled with a glyph picked by their colour
// index, so blocks that share a palette colour share a glyph.
// `render_legend()` names the palette colour behind each glyph in use.

use tower_chimes_sim::{PegId, TowerSystem};

use crate::config::Palette;

const GLYPHS: [char; 7] = ['#', '=', '*', '+', '%', '@', 'o'];

fn glyph(color_index: usize) -> char {
    GLYPHS[color_index % GLYPHS.len()]
}

/// Render `tower` as one string with a trailing newline.
pub fn render_tower(tower: &TowerSystem) -> String {
    let height = tower.height() as usize;
    let column = 2 * height - 1;
    let mut out = String::new();

    for slot in 0..height {
        let cells: Vec<String> = PegId::ALL
            .iter()
            .map(|&peg| match tower.peg(peg).slots()[slot] {
                Some(block) => {
                    let fill = 2 * block.width as usize - 1;
                    let body = glyph(block.color_index).to_string().repeat(fill);
                    format!("{body:^column$}")
                }
                None => format!("{:^column$}", "|"),
            })
            .collect();
        out.push_str(cells.join(" ").trim_end());
        out.push('\n');
    }

    let labels: Vec<String> = PegId::ALL
        .iter()
        .map(|peg| format!("{:^column$}", peg.number()))
        .collect();
    out.push_str(labels.join(" ").trim_end());
    out.push('\n');
    out
}

/// One line mapping each glyph on `tower` to its colour in `palette`.
pub fn render_legend(tower: &TowerSystem, palette: Palette) -> String {
    let in_use = tower.palette_size().min(tower.height() as usize);
    let entries: Vec<String> = (0..in_use)
        .map(|index| format!("{} {}", glyph(index), palette.color(index)))
        .collect();
    format!("{}\n", entries.join("  "))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tower_chimes_sim::SolveRun;

    #[test]
    fn seeded_tower_sits_on_the_first_peg() {
        let tower = TowerSystem::new(3, 3).unwrap();
        let expected = concat!(
            "  #     |     |\n",
            " ===    |     |\n",
            "*****   |     |\n",
            "  1     2     3\n",
        );
        assert_eq!(render_tower(&tower), expected);
    }

    #[test]
    fn solved_tower_sits_on_the_third_peg() {
        let mut tower = TowerSystem::new(2, 1).unwrap();
        SolveRun::for_tower(&tower)
            .unwrap()
            .run_to_end(&mut tower)
            .unwrap();
        let expected = concat!(" |   |   #\n", " |   |  ###\n", " 1   2   3\n");
        assert_eq!(render_tower(&tower), expected);
    }

    #[test]
    fn legend_names_palette_colours_in_use() {
        let tower = TowerSystem::new(5, Palette::Ryb.size()).unwrap();
        assert_eq!(
            render_legend(&tower, Palette::Ryb),
            "# red  = yellow  * blue\n"
        );

        // Only two blocks, so only two colours appear.
        let short = TowerSystem::new(2, Palette::Rainbow.size()).unwrap();
        assert_eq!(render_legend(&short, Palette::Rainbow), "# red  = orange\n");
    }
}
