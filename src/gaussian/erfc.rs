//! Complementary error function and its inverse
//!
//! `erfc` uses the classic piecewise rational approximations (fdlibm
//! coefficients), accurate to a few ulps over the whole real line.
//! `inv_erfc` uses a central rational approximation, a tail approximation in
//! `sqrt(-2 ln(y / 2))` and one Newton-Raphson refinement through `erfc`.

use std::f64::consts::PI;

/// ln(sqrt(2 pi))
pub const LOG_SQRT_2PI: f64 = 0.918_938_533_204_672_7;

/// 1 / sqrt(2 pi)
pub const INV_SQRT_2PI: f64 = 0.398_942_280_401_432_7;

const ERX: f64 = 8.450_629_115_104_675_292_97e-01;

const PP: [f64; 5] = [
    1.283_791_670_955_125_585_61e-01,
    -3.250_421_072_470_014_993_70e-01,
    -2.848_174_957_559_851_047_66e-02,
    -5.770_270_296_489_441_591_57e-03,
    -2.376_301_665_665_016_260_84e-05,
];
const QQ: [f64; 5] = [
    3.979_172_239_591_553_528_19e-01,
    6.502_224_998_876_729_444_85e-02,
    5.081_306_281_875_765_627_76e-03,
    1.324_947_380_043_216_445_26e-04,
    -3.960_228_278_775_368_123_20e-06,
];

const PA: [f64; 7] = [
    -2.362_118_560_752_659_440_77e-03,
    4.148_561_186_837_483_316_66e-01,
    -3.722_078_760_357_013_238_47e-01,
    3.183_466_199_011_617_536_74e-01,
    -1.108_946_942_823_966_774_76e-01,
    3.547_830_432_561_823_593_71e-02,
    -2.166_375_594_868_790_843_00e-03,
];
const QA: [f64; 6] = [
    1.064_208_804_008_442_282_86e-01,
    5.403_979_177_021_710_489_37e-01,
    7.182_865_441_419_626_628_68e-02,
    1.261_712_198_087_616_421_12e-01,
    1.363_708_391_202_905_073_62e-02,
    1.198_449_984_679_910_741_70e-02,
];

const RA: [f64; 8] = [
    -9.864_944_034_847_148_227_05e-03,
    -6.938_585_727_071_817_643_72e-01,
    -1.055_862_622_532_329_098_14e+01,
    -6.237_533_245_032_600_603_96e+01,
    -1.623_966_694_625_734_703_55e+02,
    -1.846_050_929_067_110_359_94e+02,
    -8.128_743_550_630_659_342_46e+01,
    -9.814_329_344_169_145_485_92e+00,
];
const SA: [f64; 8] = [
    1.965_127_166_743_925_712_92e+01,
    1.376_577_541_435_190_426_00e+02,
    4.345_658_774_752_292_288_21e+02,
    6.453_872_717_332_678_803_36e+02,
    4.290_081_400_275_678_333_86e+02,
    1.086_350_055_417_794_351_34e+02,
    6.570_249_770_319_281_701_35e+00,
    -6.042_441_521_485_809_874_38e-02,
];

const RB: [f64; 7] = [
    -9.864_942_924_700_099_285_97e-03,
    -7.992_832_376_805_230_065_74e-01,
    -1.775_795_491_775_475_198_89e+01,
    -1.606_363_848_558_219_160_62e+02,
    -6.375_664_433_683_896_277_22e+02,
    -1.025_095_131_611_077_249_54e+03,
    -4.835_191_916_086_513_970_19e+02,
];
const SB: [f64; 7] = [
    3.033_806_074_348_245_829_24e+01,
    3.257_925_129_965_739_188_26e+02,
    1.536_729_586_084_436_959_94e+03,
    3.199_858_219_508_595_539_08e+03,
    2.553_050_406_433_164_425_83e+03,
    4.745_285_412_069_553_672_15e+02,
    -2.244_095_244_658_581_833_62e+01,
];

/// Horner evaluation, lowest-order coefficient first.
fn poly(coefficients: &[f64], z: f64) -> f64 {
    coefficients.iter().rev().fold(0.0, |acc, c| acc * z + c)
}

/// Complementary error function `1 - erf(x)`.
pub fn erfc(x: f64) -> f64 {
    if x.is_nan() {
        return f64::NAN;
    }

    let negative = x < 0.0;
    let x = x.abs();

    if x < 0.84375 {
        let temp = if x < 1.0 / (1u64 << 56) as f64 {
            x
        } else {
            let z = x * x;
            let y = poly(&PP, z) / (1.0 + z * poly(&QQ, z));
            if x < 0.25 {
                x + x * y
            } else {
                0.5 + (x * y + (x - 0.5))
            }
        };
        return if negative { 1.0 + temp } else { 1.0 - temp };
    }

    if x < 1.25 {
        let s = x - 1.0;
        let p = poly(&PA, s);
        let q = 1.0 + s * poly(&QA, s);
        return if negative {
            1.0 + ERX + p / q
        } else {
            1.0 - ERX - p / q
        };
    }

    if x < 28.0 {
        let s = 1.0 / (x * x);
        let (r, q) = if x < 1.0 / 0.35 {
            (poly(&RA, s), 1.0 + s * poly(&SA, s))
        } else {
            if negative && x > 6.0 {
                return 2.0;
            }
            (poly(&RB, s), 1.0 + s * poly(&SB, s))
        };
        // Split x so z*z is exact.
        let z = f64::from_bits(x.to_bits() & 0xffff_ffff_0000_0000);
        let r = (-z * z - 0.5625).exp() * ((z - x) * (z + x) + r / q).exp();
        return if negative { 2.0 - r / x } else { r / x };
    }

    if negative {
        2.0
    } else {
        0.0
    }
}

fn tail_rational(q: f64) -> f64 {
    let mut q1 = 0.005_504_751_339_936_943;
    q1 = q1 * q + 0.227_968_721_711_411_8;
    q1 = q1 * q + 1.697_592_457_770_869;
    q1 = q1 * q + 1.802_933_168_781_95;
    q1 = q1 * q - 3.093_354_679_843_504;
    q1 = q1 * q - 2.077_595_676_404_383;

    let mut q2 = 0.007_784_695_709_041_462;
    q2 = q2 * q + 0.322_467_129_070_039_8;
    q2 = q2 * q + 2.445_134_137_142_996;
    q2 = q2 * q + 3.754_408_661_907_416;
    q2 = q2 * q + 1.0;

    q1 / q2
}

/// Inverse of [`erfc`] on `[0, 2]`.
///
/// Returns NaN outside the domain, `+inf` at 0 and `-inf` at 2.
pub fn inv_erfc(y: f64) -> f64 {
    if y.is_nan() || !(0.0..=2.0).contains(&y) {
        return f64::NAN;
    }
    if y == 0.0 {
        return f64::INFINITY;
    }
    if y == 2.0 {
        return f64::NEG_INFINITY;
    }

    let x = if (0.0485..=1.9515).contains(&y) {
        let q = y - 1.0;
        let r = q * q;
        let mut r1 = 0.013_706_004_827_785_35;
        r1 = r1 * r - 0.305_141_571_235_720_3;
        r1 = r1 * r + 1.524_304_069_216_834;
        r1 = r1 * r - 3.057_303_267_970_988;
        r1 = r1 * r + 2.710_410_832_036_097;
        r1 = r1 * r - 0.886_226_926_452_691_5;
        let mut r2 = -0.053_199_315_232_640_68;
        r2 = r2 * r + 0.631_194_675_226_722_2;
        r2 = r2 * r - 2.432_796_560_310_728;
        r2 = r2 * r + 4.175_081_992_982_483;
        r2 = r2 * r - 3.320_170_388_221_43;
        r2 = r2 * r + 1.0;
        r1 * q / r2
    } else if y < 0.0485 {
        tail_rational((-2.0 * (y / 2.0).ln()).sqrt())
    } else {
        -tail_rational((-2.0 * (1.0 - y / 2.0).ln()).sqrt())
    };

    let u = (erfc(x) - y) / (-2.0 / PI.sqrt() * (-x * x).exp());
    x - u / (1.0 + x * u)
}
