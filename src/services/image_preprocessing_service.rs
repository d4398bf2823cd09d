//! Preprocesamiento de imágenes para OCR de patentes
//!
//! Convierte una foto en color en una imagen binaria (0/255) del mismo tamaño:
//! escala de grises, filtro bilateral, CLAHE, binarización adaptativa
//! gaussiana y cierre morfológico 3x3. Todas las etapas son funciones puras.

use image::{DynamicImage, GrayImage, Luma};
use imageproc::distance_transform::Norm;
use imageproc::filter::separable_filter_equal;
use imageproc::morphology::close;
use tracing::debug;

/// Parámetros de cada etapa del preprocesamiento
#[derive(Debug, Clone)]
pub struct PreprocessingConfig {
    /// Radio del filtro bilateral (diámetro 11)
    pub bilateral_radius: u32,
    pub bilateral_sigma_color: f32,
    pub bilateral_sigma_space: f32,
    /// Límite de recorte del histograma de CLAHE
    pub clahe_clip_limit: f32,
    /// Cantidad de tiles por eje de CLAHE
    pub clahe_grid: u32,
    /// Tamaño de bloque impar de la binarización adaptativa
    pub threshold_block_size: u32,
    /// Constante restada a la media local
    pub threshold_c: i16,
    /// Radio del elemento estructurante cuadrado (1 = 3x3)
    pub closing_radius: u8,
}

impl Default for PreprocessingConfig {
    fn default() -> Self {
        Self {
            bilateral_radius: 5,
            bilateral_sigma_color: 17.0,
            bilateral_sigma_space: 17.0,
            clahe_clip_limit: 2.0,
            clahe_grid: 8,
            threshold_block_size: 11,
            threshold_c: 2,
            closing_radius: 1,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ImagePreprocessor {
    config: PreprocessingConfig,
}

impl ImagePreprocessor {
    /// Ejecutar el pipeline completo. Nunca falla: los errores de decodificación
    /// se manejan antes de llegar acá.
    pub fn preprocess(&self, image: &DynamicImage) -> GrayImage {
        let c = &self.config;
        let gray = image.to_luma8();
        debug!("🖼️  Preprocesando imagen {}x{}", gray.width(), gray.height());

        let smoothed = bilateral_filter(
            &gray,
            c.bilateral_radius,
            c.bilateral_sigma_color,
            c.bilateral_sigma_space,
        );
        let equalized = clahe(&smoothed, c.clahe_clip_limit, c.clahe_grid);
        let binary = adaptive_threshold_gaussian(&equalized, c.threshold_block_size, c.threshold_c);
        close(&binary, Norm::LInf, c.closing_radius)
    }
}

/// Filtro bilateral: suaviza el ruido conservando los bordes de los caracteres.
///
/// Ventana circular de radio `radius`; cada vecino pesa según su distancia
/// espacial (`sigma_space`) y su diferencia de intensidad (`sigma_color`).
pub fn bilateral_filter(
    image: &GrayImage,
    radius: u32,
    sigma_color: f32,
    sigma_space: f32,
) -> GrayImage {
    let (width, height) = image.dimensions();
    let r = radius as i64;
    let color_coeff = -0.5 / (sigma_color * sigma_color);
    let space_coeff = -0.5 / (sigma_space * sigma_space);

    let color_weights: Vec<f32> = (0..256u32)
        .map(|d| ((d * d) as f32 * color_coeff).exp())
        .collect();

    let mut offsets = Vec::new();
    for dy in -r..=r {
        for dx in -r..=r {
            let dist_sq = dx * dx + dy * dy;
            if dist_sq > r * r {
                continue;
            }
            offsets.push((dx, dy, (dist_sq as f32 * space_coeff).exp()));
        }
    }

    let mut output = GrayImage::new(width, height);
    for y in 0..height {
        for x in 0..width {
            let center = image.get_pixel(x, y)[0];
            let mut sum = 0.0f32;
            let mut weight_sum = 0.0f32;

            for &(dx, dy, space_weight) in &offsets {
                let nx = x as i64 + dx;
                let ny = y as i64 + dy;
                if nx < 0 || ny < 0 || nx >= width as i64 || ny >= height as i64 {
                    continue;
                }
                let value = image.get_pixel(nx as u32, ny as u32)[0];
                let weight = space_weight * color_weights[center.abs_diff(value) as usize];
                sum += weight * value as f32;
                weight_sum += weight;
            }

            // The center pixel always contributes with weight 1.
            let filtered = (sum / weight_sum).round().clamp(0.0, 255.0) as u8;
            output.put_pixel(x, y, Luma([filtered]));
        }
    }

    output
}

/// Ecualización adaptativa de histograma con límite de contraste (CLAHE).
///
/// La imagen se divide en `grid x grid` tiles; cada tile obtiene una tabla
/// de ecualización con el histograma recortado a `clip_limit` veces la media
/// por bin, y cada píxel interpola bilinealmente entre los cuatro tiles
/// vecinos para evitar bordes entre bloques.
pub fn clahe(image: &GrayImage, clip_limit: f32, grid: u32) -> GrayImage {
    let (width, height) = image.dimensions();
    if width == 0 || height == 0 {
        return image.clone();
    }

    let grid = grid.max(1);
    let tile_w = width.div_ceil(grid);
    let tile_h = height.div_ceil(grid);
    let tiles_x = width.div_ceil(tile_w);
    let tiles_y = height.div_ceil(tile_h);

    let mut luts = vec![[0u8; 256]; (tiles_x * tiles_y) as usize];
    for ty in 0..tiles_y {
        for tx in 0..tiles_x {
            let x0 = tx * tile_w;
            let x1 = (x0 + tile_w).min(width);
            let y0 = ty * tile_h;
            let y1 = (y0 + tile_h).min(height);

            let mut histogram = [0u32; 256];
            for y in y0..y1 {
                for x in x0..x1 {
                    histogram[image.get_pixel(x, y)[0] as usize] += 1;
                }
            }

            let area = (x1 - x0) * (y1 - y0);
            luts[(ty * tiles_x + tx) as usize] = tile_lut(&mut histogram, area, clip_limit);
        }
    }

    let mut output = GrayImage::new(width, height);
    for y in 0..height {
        let (ty0, ty1, ay) = interpolation_cell(y, tile_h, tiles_y);
        for x in 0..width {
            let (tx0, tx1, ax) = interpolation_cell(x, tile_w, tiles_x);
            let value = image.get_pixel(x, y)[0] as usize;
            let mapped = |tx: u32, ty: u32| luts[(ty * tiles_x + tx) as usize][value] as f32;

            let top = mapped(tx0, ty0) * (1.0 - ax) + mapped(tx1, ty0) * ax;
            let bottom = mapped(tx0, ty1) * (1.0 - ax) + mapped(tx1, ty1) * ax;
            let result = top * (1.0 - ay) + bottom * ay;
            output.put_pixel(x, y, Luma([result.round().clamp(0.0, 255.0) as u8]));
        }
    }

    output
}

/// Tabla de ecualización de un tile con el exceso redistribuido entre bins
fn tile_lut(histogram: &mut [u32; 256], area: u32, clip_limit: f32) -> [u8; 256] {
    let limit = ((clip_limit * area as f32) / 256.0).max(1.0) as u32;

    let mut excess = 0u32;
    for bin in histogram.iter_mut() {
        if *bin > limit {
            excess += *bin - limit;
            *bin = limit;
        }
    }

    let per_bin = excess / 256;
    let remainder = excess % 256;
    for (i, bin) in histogram.iter_mut().enumerate() {
        *bin += per_bin;
        if (i as u32) < remainder {
            *bin += 1;
        }
    }

    let scale = 255.0 / area as f32;
    let mut lut = [0u8; 256];
    let mut cdf = 0u32;
    for (i, bin) in histogram.iter().enumerate() {
        cdf += *bin;
        lut[i] = (cdf as f32 * scale).round().min(255.0) as u8;
    }
    lut
}

/// Tiles vecinos y peso de interpolación para una coordenada
fn interpolation_cell(pos: u32, tile_size: u32, tiles: u32) -> (u32, u32, f32) {
    let f = (pos as f32 + 0.5) / tile_size as f32 - 0.5;
    let i0 = (f.floor().max(0.0) as u32).min(tiles - 1);
    let i1 = (i0 + 1).min(tiles - 1);
    let weight = (f - i0 as f32).clamp(0.0, 1.0);
    (i0, i1, weight)
}

/// Kernel gaussiano 1D normalizado de `size` taps (impar).
///
/// Sigma se deriva del tamaño como en la binarización adaptativa clásica:
/// `0.3 * ((size - 1) / 2 - 1) + 0.8`. El kernel cubre el bloque completo,
/// no el radio `2 * sigma` que usaría `gaussian_blur_f32`.
pub fn gaussian_kernel(size: u32) -> Vec<f32> {
    let sigma = 0.3 * ((size as f32 - 1.0) * 0.5 - 1.0) + 0.8;
    let center = (size / 2) as f32;
    let mut kernel: Vec<f32> = (0..size)
        .map(|i| {
            let x = i as f32 - center;
            (-(x * x) / (2.0 * sigma * sigma)).exp()
        })
        .collect();
    let sum: f32 = kernel.iter().sum();
    kernel.iter_mut().for_each(|w| *w /= sum);
    kernel
}

/// Binarización adaptativa gaussiana.
///
/// Un píxel queda blanco (255) si es estrictamente mayor que la media
/// gaussiana de su bloque menos `c`; si no, negro (0).
pub fn adaptive_threshold_gaussian(image: &GrayImage, block_size: u32, c: i16) -> GrayImage {
    let (width, height) = image.dimensions();
    let kernel = gaussian_kernel(block_size.max(3) | 1);
    let local_mean = separable_filter_equal(image, &kernel);

    let mut output = GrayImage::new(width, height);
    for (x, y, pixel) in image.enumerate_pixels() {
        let threshold = local_mean.get_pixel(x, y)[0] as i16 - c;
        let value = if pixel[0] as i16 > threshold { 255 } else { 0 };
        output.put_pixel(x, y, Luma([value]));
    }
    output
}
