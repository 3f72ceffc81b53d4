use lounge_viz::platform::FrequencyAnalyser;
use lounge_viz::spectrum::{
    image_sample, AggregateSignal, SpectrumFrame, SpectrumInput, SpectrumSource, BASS_BINS,
    DEFAULT_BIN_COUNT, MAX_BIN_COUNT, MIN_BIN_COUNT,
};
use proptest::prelude::*;

/// Analyser that reports bin `i` as `i % 256`.
struct Ramp(usize);

impl FrequencyAnalyser for Ramp {
    fn bin_count(&self) -> usize {
        self.0
    }

    fn byte_frequency_data(&self, out: &mut [u8]) {
        for (i, v) in out.iter_mut().take(self.0).enumerate() {
            *v = (i % 256) as u8;
        }
    }
}

#[test]
fn image_signal_is_centered_at_time_zero() {
    assert_eq!(image_sample(0, 0.0), 128);
}

#[test]
fn image_signal_is_deterministic() {
    let mut a = SpectrumSource::new(DEFAULT_BIN_COUNT);
    let mut b = SpectrumSource::new(DEFAULT_BIN_COUNT);
    a.refresh(SpectrumInput::Image, 3.7);
    b.refresh(SpectrumInput::Image, 3.7);
    assert_eq!(a.current_frame(), b.current_frame());
    for (i, &v) in a.current_frame().bins().iter().enumerate() {
        assert_eq!(v, image_sample(i, 3.7));
    }
}

#[test]
fn image_signal_moves_with_time() {
    let mut src = SpectrumSource::new(64);
    src.refresh(SpectrumInput::Image, 0.0);
    let first = src.current_frame().clone();
    src.refresh(SpectrumInput::Image, 0.5);
    assert_ne!(&first, src.current_frame());
}

#[test]
fn silent_input_zeroes_the_frame() {
    let mut src = SpectrumSource::new(64);
    src.refresh(SpectrumInput::Image, 1.0);
    src.refresh(SpectrumInput::Silent, 1.0);
    assert!(src.current_frame().bins().iter().all(|&b| b == 0));
}

#[test]
fn detached_input_keeps_the_previous_frame() {
    let mut src = SpectrumSource::new(64);
    src.refresh(SpectrumInput::Image, 1.0);
    let before = src.current_frame().clone();
    src.refresh(SpectrumInput::Detached, 9.0);
    assert_eq!(&before, src.current_frame());
}

#[test]
fn matching_analyser_copies_directly() {
    let mut src = SpectrumSource::new(64);
    let analyser = Ramp(64);
    src.refresh(SpectrumInput::Analyser(&analyser), 0.0);
    assert_eq!(src.current_frame().get(0), 0);
    assert_eq!(src.current_frame().get(63), 63);
}

#[test]
fn larger_analyser_is_resampled_proportionally() {
    let mut src = SpectrumSource::new(64);
    let analyser = Ramp(128);
    src.refresh(SpectrumInput::Analyser(&analyser), 0.0);
    assert_eq!(src.current_frame().len(), 64);
    assert_eq!(src.current_frame().get(1), 2);
    assert_eq!(src.current_frame().get(63), 126);
}

#[test]
fn empty_analyser_leaves_the_frame_alone() {
    let mut src = SpectrumSource::new(32);
    src.refresh(SpectrumInput::Image, 2.0);
    let before = src.current_frame().clone();
    src.refresh(SpectrumInput::Analyser(&Ramp(0)), 2.0);
    assert_eq!(&before, src.current_frame());
}

#[test]
fn bin_count_is_clamped() {
    assert_eq!(SpectrumSource::new(1).bin_count(), MIN_BIN_COUNT);
    assert_eq!(SpectrumSource::new(1 << 20).bin_count(), MAX_BIN_COUNT);
    assert_eq!(SpectrumSource::new(512).bin_count(), 512);
}

#[test]
fn out_of_range_lookup_reads_silence() {
    let frame = SpectrumFrame::from_bins(vec![9; 4]);
    assert_eq!(frame.get(4), 0);
    assert_eq!(frame.get(usize::MAX), 0);
    assert_eq!(frame.proportional(8, 8), 0);
}

#[test]
fn empty_bins_become_a_single_silent_bin() {
    let frame = SpectrumFrame::from_bins(Vec::new());
    assert_eq!(frame.len(), 1);
    assert_eq!(frame.get(0), 0);
}

#[test]
fn aggregate_signal_reports_mean_bass_and_peak() {
    let mut bins = vec![0u8; 100];
    for b in bins.iter_mut().take(BASS_BINS) {
        *b = 200;
    }
    bins[50] = 255;
    let signal = AggregateSignal::compute(&SpectrumFrame::from_bins(bins));
    assert_eq!(signal.bass, 200.0);
    assert_eq!(signal.peak, 255);
    assert!((signal.mean - (200.0 * 10.0 + 255.0) / 100.0).abs() < 1e-4);
    assert!((signal.bass_level() - 200.0 / 255.0).abs() < 1e-6);
}

#[test]
fn aggregate_signal_handles_frames_shorter_than_the_bass_band() {
    let signal = AggregateSignal::compute(&SpectrumFrame::from_bins(vec![60, 120]));
    assert_eq!(signal.bass, 90.0);
    assert_eq!(signal.mean, 90.0);
}

proptest! {
    #[test]
    fn proportional_lookup_stays_in_bounds(
        bins in proptest::collection::vec(any::<u8>(), 1..512),
        required in 1usize..1024,
    ) {
        let frame = SpectrumFrame::from_bins(bins.clone());
        for i in 0..required {
            let idx = i * bins.len() / required;
            prop_assert_eq!(frame.proportional(i, required), bins[idx]);
        }
    }

    #[test]
    fn levels_are_normalized(bins in proptest::collection::vec(any::<u8>(), 1..256), i in 0usize..512) {
        let frame = SpectrumFrame::from_bins(bins);
        let lv = frame.level(i, 256);
        prop_assert!((0.0..=1.0).contains(&lv));
        let signal = AggregateSignal::compute(&frame);
        prop_assert!((0.0..=1.0).contains(&signal.mean_level()));
        prop_assert!((0.0..=1.0).contains(&signal.bass_level()));
    }
}
