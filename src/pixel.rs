/// Number of bytes every backbuffer pixel occupies.
pub const BYTES_PER_PIXEL: usize = 4;

/// A backbuffer pixel.
///
/// # Representation
///
/// This is a set of `u8`'s in the order BGRX (first component blue, second green, third red and
/// last unused). It has exactly the layout of four consecutive bytes in the backbuffer's pixel
/// memory, with an alignment of `4` so the compiler can treat it as a `u32`.
///
/// # Example
///
/// Construct a new pixel.
///
/// ```
/// # use handmade_platform::Pixel;
/// #
/// let orange = Pixel::new_rgb(0xff, 0x80, 0);
/// assert_eq!(orange.r, 255);
/// assert_eq!(orange.g, 128);
/// assert_eq!(orange.b, 0);
///
/// let from_struct_literal = Pixel { r: 255, g: 0x80, b: 0, x: 0 };
/// assert_eq!(orange, from_struct_literal);
/// ```
///
/// Read a pixel out of raw backbuffer bytes.
///
/// ```
/// # use handmade_platform::Pixel;
/// #
/// let bytes = [0x10, 0x20, 0x30, 0x00];
/// let pixel = Pixel::from_bytes(bytes);
/// assert_eq!((pixel.b, pixel.g, pixel.r), (0x10, 0x20, 0x30));
/// assert_eq!(pixel.to_bytes(), bytes);
/// ```
#[repr(C)]
#[repr(align(4))]
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
pub struct Pixel {
    /// The blue component.
    pub b: u8,
    /// The green component.
    pub g: u8,
    /// The red component.
    pub r: u8,
    /// Padding, not displayed.
    pub x: u8,
}

impl Pixel {
    /// Create a new pixel from a red, a green and a blue component.
    pub const fn new_rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, x: 0 }
    }

    /// Create a pixel from four backbuffer bytes in BGRX order.
    #[inline]
    pub const fn from_bytes(bytes: [u8; BYTES_PER_PIXEL]) -> Self {
        Self {
            b: bytes[0],
            g: bytes[1],
            r: bytes[2],
            x: bytes[3],
        }
    }

    /// The four backbuffer bytes of this pixel in BGRX order.
    #[inline]
    pub const fn to_bytes(self) -> [u8; BYTES_PER_PIXEL] {
        [self.b, self.g, self.r, self.x]
    }

    /// Pack into a `0x00RRGGBB` word, the format window surfaces consume.
    ///
    /// ```
    /// # use handmade_platform::Pixel;
    /// #
    /// assert_eq!(Pixel::new_rgb(0xff, 0x80, 0x01).to_xrgb(), 0x00ff_8001);
    /// ```
    #[inline]
    pub const fn to_xrgb(self) -> u32 {
        (self.r as u32) << 16 | (self.g as u32) << 8 | self.b as u32
    }
}
