use std::fmt::Write;

use futures::{FutureExt, future::BoxFuture};

use crate::{
    render::{PuzzleRenderer, RenderError, RenderResult, RenderedImage},
    state::puzzle::Puzzle,
};

/// Default size in pixels of one grid unit.
pub const DEFAULT_CELL_SIZE: u32 = 256;

/// Share of a grid unit covered by a swatch, centred in its unit.
const MARK_SIZE: f64 = 0.8;
/// Distance of the row/column labels from the canvas edge, in grid units.
const LABEL_OFFSET: f64 = 0.6;

/// Renders puzzles as standalone SVG documents.
///
/// The canvas spans `width + 1.5` by `height + 1.5` grid units: column numbers run along the
/// top, row letters down the left edge, and each cell is a filled square.
#[derive(Debug, Clone, Copy)]
pub struct SvgRenderer {
    cell_size: u32,
}

impl SvgRenderer {
    pub fn new(cell_size: u32) -> Self {
        Self { cell_size }
    }

    /// Build the SVG document for `puzzle`.
    pub fn render_svg(&self, puzzle: &Puzzle) -> RenderResult<String> {
        if self.cell_size == 0 {
            return Err(RenderError::Unavailable("cell size must be positive".into()));
        }

        let unit = f64::from(self.cell_size);
        #[allow(clippy::cast_precision_loss)]
        let (canvas_w, canvas_h) = (
            (puzzle.width as f64 + 1.5) * unit,
            (puzzle.height as f64 + 1.5) * unit,
        );

        let mut svg = String::new();
        write_document(&mut svg, puzzle, unit, canvas_w, canvas_h)
            .map_err(|err| RenderError::Failed(err.to_string()))?;
        Ok(svg)
    }
}

impl Default for SvgRenderer {
    fn default() -> Self {
        Self::new(DEFAULT_CELL_SIZE)
    }
}

impl PuzzleRenderer for SvgRenderer {
    fn render(&self, puzzle: &Puzzle) -> BoxFuture<'static, RenderResult<RenderedImage>> {
        let result = self.render_svg(puzzle).map(|data| RenderedImage {
            content_type: "image/svg+xml",
            data,
        });
        async move { result }.boxed()
    }
}

#[allow(clippy::cast_precision_loss)]
fn write_document(
    svg: &mut String,
    puzzle: &Puzzle,
    unit: f64,
    canvas_w: f64,
    canvas_h: f64,
) -> std::fmt::Result {
    writeln!(
        svg,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{canvas_w}" height="{canvas_h}" viewBox="0 0 {canvas_w} {canvas_h}">"#
    )?;
    writeln!(
        svg,
        r#"<rect x="0" y="0" width="{canvas_w}" height="{canvas_h}" fill="{}"/>"#,
        puzzle.background
    )?;
    writeln!(
        svg,
        r#"<g fill="{}" font-family="sans-serif" font-size="{}" text-anchor="middle" dominant-baseline="middle">"#,
        puzzle.foreground,
        unit / 2.0
    )?;
    for index in 1..=puzzle.width {
        writeln!(
            svg,
            r#"<text x="{}" y="{}">{index}</text>"#,
            (index as f64 + 0.5) * unit,
            LABEL_OFFSET * unit
        )?;
    }
    for (index, letter) in (1..=puzzle.height).zip('A'..='Z') {
        writeln!(
            svg,
            r#"<text x="{}" y="{}">{letter}</text>"#,
            LABEL_OFFSET * unit,
            (index as f64 + 0.5) * unit
        )?;
    }
    writeln!(svg, "</g>")?;

    let side = MARK_SIZE * unit;
    for (row, cells) in puzzle.grid.iter().enumerate() {
        for (col, color) in cells.iter().enumerate() {
            let x = (col as f64 + 1.5) * unit - side / 2.0;
            let y = (row as f64 + 1.5) * unit - side / 2.0;
            writeln!(
                svg,
                r#"<rect x="{x}" y="{y}" width="{side}" height="{side}" fill="{color}"/>"#
            )?;
        }
    }
    writeln!(svg, "</svg>")
}

#[cfg(test)]
mod tests {
    use rand::{SeedableRng, rngs::StdRng};

    use super::*;
    use crate::state::puzzle::Level;

    fn puzzle(level: Level) -> Puzzle {
        Puzzle::generate(level, &mut StdRng::seed_from_u64(9))
    }

    #[test]
    fn canvas_matches_grid_size() {
        let svg = SvgRenderer::new(100).render_svg(&puzzle(Level::FIRST)).unwrap();
        assert!(svg.starts_with(r#"<svg xmlns="http://www.w3.org/2000/svg" width="350" height="350""#));

        let svg = SvgRenderer::new(100).render_svg(&puzzle(Level::MAX)).unwrap();
        assert!(svg.contains(r#"width="450" height="450""#));
    }

    #[test]
    fn draws_labels_and_every_cell() {
        let puzzle = puzzle(Level::new(4).unwrap());
        let svg = SvgRenderer::default().render_svg(&puzzle).unwrap();

        for label in [">1<", ">2<", ">3<", ">A<", ">B<"] {
            assert!(svg.contains(label), "missing label {label}");
        }
        assert!(!svg.contains(">C<"));

        // Background plus one square per cell.
        assert_eq!(svg.matches("<rect").count(), 1 + puzzle.width * puzzle.height);
        assert!(svg.contains(&format!(r#"fill="{}""#, puzzle.base_color)));
        for row in &puzzle.grid {
            for color in row {
                assert!(svg.contains(&color.to_string()));
            }
        }
    }

    #[test]
    fn first_cell_is_centred_in_its_unit() {
        let svg = SvgRenderer::new(100).render_svg(&puzzle(Level::FIRST)).unwrap();
        assert!(svg.contains(r#"<rect x="110" y="110" width="80" height="80""#));
    }

    #[test]
    fn zero_cell_size_is_an_error() {
        let err = SvgRenderer::new(0).render_svg(&puzzle(Level::FIRST)).unwrap_err();
        assert!(matches!(err, RenderError::Unavailable(_)));
    }

    #[tokio::test]
    async fn renderer_trait_returns_svg_image() {
        let puzzle = puzzle(Level::FIRST);
        let image = SvgRenderer::default().render(&puzzle).await.unwrap();
        assert_eq!(image.content_type, "image/svg+xml");
        assert!(image.data.ends_with("</svg>\n"));
    }
}
