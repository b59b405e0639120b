use std::fmt::Write;

use crate::Error;

/// An RGB color with integer channels. Channels are nominally in `0..=255`, but may leave that
/// range while shading; [`Pixel::clamp`] brings them back.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Pixel {
    pub r: i32,
    pub g: i32,
    pub b: i32,
}

/// A buffer of pixels, with the top-left being `(0,0)`.
#[derive(Debug, Clone)]
pub struct Canvas {
    width: u32,
    height: u32,
    buffer: Vec<Pixel>,
}

/// An iterator for the rows of the image, starting at the top and working down.
pub struct Rows<'a> {
    canvas: &'a Canvas,
    row: usize,
}

impl Pixel {
    pub const fn new(r: i32, g: i32, b: i32) -> Self {
        Self { r, g, b }
    }

    pub const fn black() -> Self {
        Self::new(0, 0, 0)
    }

    /// The sky color used when a primary ray escapes the scene.
    pub const fn background() -> Self {
        Self::new(75, 146, 176)
    }

    pub fn is_black(&self) -> bool {
        self.r == 0 && self.g == 0 && self.b == 0
    }

    /// Add the same amount to every channel.
    pub fn brighten(&mut self, amount: i32) {
        self.r += amount;
        self.g += amount;
        self.b += amount;
    }

    /// Clamp every channel into `0..=255`.
    pub fn clamp(self) -> Self {
        let convert = |x: i32| x.clamp(0, 255);
        Self::new(convert(self.r), convert(self.g), convert(self.b))
    }

    pub fn to_u8(&self) -> [u8; 3] {
        let Pixel { r, g, b } = self.clamp();
        [r as u8, g as u8, b as u8]
    }
}

impl std::ops::Add for Pixel {
    type Output = Pixel;
    fn add(mut self, rhs: Pixel) -> Self::Output {
        self += rhs;
        self
    }
}

impl std::ops::AddAssign for Pixel {
    fn add_assign(&mut self, rhs: Pixel) {
        self.r += rhs.r;
        self.g += rhs.g;
        self.b += rhs.b;
    }
}

impl Canvas {
    /// Construct a new [`Canvas`], filled with black. Fails when a buffer of `width` by
    /// `height` pixels can't be addressed.
    pub fn new(width: u32, height: u32) -> Result<Self, Error> {
        let size = (width as usize)
            .checked_mul(height as usize)
            .filter(|size| {
                size.checked_mul(std::mem::size_of::<Pixel>())
                    .map_or(false, |bytes| bytes <= isize::MAX as usize)
            })
            .ok_or(Error::CanvasTooLarge { width, height })?;

        let mut buffer = Vec::with_capacity(size);
        buffer.resize_with(size, Default::default);
        Ok(Self {
            width,
            height,
            buffer,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    fn index(&self, x: usize, y: usize) -> usize {
        (self.width as usize) * y + x
    }

    /// Mutate a pixel in the [`Canvas`].
    pub fn get_mut(&mut self, x: usize, y: usize) -> &mut Pixel {
        let ix = self.index(x, y);
        &mut self.buffer[ix]
    }

    /// Fetch a pixel in the [`Canvas`].
    pub fn get(&self, x: usize, y: usize) -> &Pixel {
        let ix = self.index(x, y);
        &self.buffer[ix]
    }

    /// Copy a rendered row into place.
    pub fn blit_row(&mut self, y: usize, row: &[Pixel]) {
        let start = self.index(0, y);
        self.buffer[start..start + row.len()].copy_from_slice(row);
    }

    /// Return an iterator to the rows of the image.
    pub fn rows(&self) -> Rows<'_> {
        Rows {
            canvas: self,
            row: 0,
        }
    }

    /// Return raw image RGB8 data for the image.
    pub fn data(&self) -> Vec<u8> {
        let mut data = Vec::with_capacity(self.buffer.len() * 3);

        for row in self.rows() {
            for pixel in row {
                data.extend_from_slice(&pixel.to_u8())
            }
        }

        data
    }

    /// Return the [`Canvas`] as a frame of 24-bit ANSI background colors, two terminal cells
    /// per pixel.
    pub fn to_ansi(&self) -> String {
        // Roughly 20 bytes of escape sequence per pixel.
        let mut buf = String::with_capacity(self.buffer.len() * 20 + 16);

        // Move to the top-left corner and disable line wrapping.
        buf.push_str("\x1b[0;0H\x1b[?27l");

        for row in self.rows() {
            for pixel in row {
                let [r, g, b] = pixel.to_u8();
                // Writing to a `String` can't fail.
                let _ = write!(buf, "\x1b[48;2;{};{};{}m  ", r, g, b);
            }
            buf.push_str("\x1b[0m\r\n");
        }

        buf.push_str("\x1b[?27h\n");

        buf
    }
}

impl<'a> Iterator for Rows<'a> {
    type Item = &'a [Pixel];

    fn next(&mut self) -> Option<Self::Item> {
        if self.row >= self.canvas.height as usize {
            return None;
        }

        let len = self.canvas.width as usize;
        let start = self.row * len;

        self.row += 1;

        Some(&self.canvas.buffer[start..start + len])
    }
}

#[test]
fn test_clamp() {
    for v in [-300, -1, 0, 1, 128, 254, 255, 256, 1000] {
        let p = Pixel::new(v, v, v).clamp();
        assert_eq!(v.min(255).max(0), p.r);
        assert_eq!(p.r, p.g);
        assert_eq!(p.r, p.b);
    }

    assert_eq!(Pixel::new(255, 0, 17), Pixel::new(400, -20, 17).clamp());
}

#[test]
fn test_rows_are_top_down() {
    let mut c = Canvas::new(2, 3).unwrap();
    *c.get_mut(1, 0) = Pixel::new(1, 1, 1);
    c.blit_row(2, &[Pixel::new(2, 2, 2), Pixel::new(3, 3, 3)]);

    let rows: Vec<_> = c.rows().collect();
    assert_eq!(3, rows.len());
    assert_eq!(&[Pixel::black(), Pixel::new(1, 1, 1)], rows[0]);
    assert_eq!(&[Pixel::new(2, 2, 2), Pixel::new(3, 3, 3)], rows[2]);
    assert_eq!(&Pixel::new(3, 3, 3), c.get(1, 2));
}

#[test]
fn test_data() {
    let mut c = Canvas::new(2, 1).unwrap();
    *c.get_mut(0, 0) = Pixel::new(300, 10, -5);
    *c.get_mut(1, 0) = Pixel::background();

    assert_eq!(vec![255, 10, 0, 75, 146, 176], c.data());
}

#[test]
fn test_to_ansi() {
    let mut c = Canvas::new(2, 1).unwrap();
    *c.get_mut(0, 0) = Pixel::new(1, 2, 3);
    *c.get_mut(1, 0) = Pixel::new(999, 0, 0);

    assert_eq!(
        "\x1b[0;0H\x1b[?27l\x1b[48;2;1;2;3m  \x1b[48;2;255;0;0m  \x1b[0m\r\n\x1b[?27h\n",
        c.to_ansi()
    );
}

#[test]
fn test_oversized_canvas() {
    assert!(matches!(
        Canvas::new(u32::MAX, u32::MAX),
        Err(Error::CanvasTooLarge {
            width: u32::MAX,
            height: u32::MAX
        })
    ));

    let c = Canvas::new(70_000, 0).unwrap();
    assert_eq!(0, c.rows().count());
    assert!(c.data().is_empty());
}
