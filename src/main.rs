#![cfg_attr(target_os = "none", no_main)]
#![cfg_attr(target_os = "none", no_std)]

#[cfg(target_os = "none")]
mod firmware {
    use core::cell::RefCell;

    use cortex_m_rt::entry;
    use critical_section::Mutex;
    use panic_halt as _;

    #[cfg(feature = "defmt")]
    use defmt_rtt as _;

    use hal::{
        pac::{self, interrupt},
        prelude::*,
        serial::{Config as SerialConfig, Serial},
    };
    use stm32f7xx_hal as hal;

    use mpg_pendant::{
        hw::{self, BoardPins, Heartbeat, Led, OutPin, PortSnapshot, SampleTimer, Usart, Watchdog},
        protocol::{Engine, Link},
        quadrature::{MotionCounter, QuadratureDecoder},
        switches::{ModeSampler, SharedMode},
        Config,
    };

    /// Default clock tree after `freeze()` runs everything from the 16 MHz HSI.
    const TIMER_CLOCK_HZ: u32 = 16_000_000;

    type MpgLed = Led<OutPin<'D', 8>>;
    type Sampler = ModeSampler<'static, PortSnapshot, MpgLed>;

    static MOTION: MotionCounter = MotionCounter::new();
    static MODE: SharedMode = SharedMode::new();
    static LINK: Link = Link::new();
    static SAMPLER: Mutex<RefCell<Option<Sampler>>> = Mutex::new(RefCell::new(None));

    #[entry]
    fn main() -> ! {
        let cfg = Config::DEFAULT;

        // Peripherals
        let dp = pac::Peripherals::take().unwrap();
        let mut watchdog = Watchdog::start(dp.IWDG, cfg.watchdog_timeout_ms);

        // Clocks
        let rcc = dp.RCC.constrain();
        let clocks = rcc.cfgr.freeze();

        // GPIO
        let pins = BoardPins::new(dp.GPIOA, dp.GPIOD, dp.GPIOE);
        let mut heartbeat_led = Led::active_low(OutPin::new(pins.leds.heartbeat));
        let mpg_led = Led::active_high(OutPin::new(pins.leds.mpg));

        // USART1 (host link)
        let serial_cfg = SerialConfig {
            baud_rate: cfg.baud_rate.bps(),
            ..Default::default()
        };
        let serial = Serial::new(
            dp.USART1,
            (pins.usart1.tx, pins.usart1.rx),
            &clocks,
            serial_cfg,
        );
        let mut usart = Usart::new(serial);

        // Switch sampler on TIM6
        let snapshot = PortSnapshot::new(pins.encoder, pins.switches);
        let sampler = ModeSampler::new(
            snapshot,
            mpg_led,
            &MODE,
            cfg.slow_flash_ticks,
            cfg.fast_flash_ticks,
        );
        critical_section::with(|cs| SAMPLER.borrow_ref_mut(cs).replace(sampler));
        let _timer = SampleTimer::tim6(dp.TIM6, TIMER_CLOCK_HZ, cfg.sample_rate_hz);

        let mut decoder =
            QuadratureDecoder::new(&MOTION, PortSnapshot::encoder(), cfg.quarters_per_detent);
        let mut engine = Engine::new(&LINK, &MOTION, &MODE);
        let mut heartbeat = Heartbeat::new(cfg.heartbeat_period);

        #[cfg(feature = "defmt")]
        defmt::info!("mpg-pendant up, {} baud", cfg.baud_rate);

        unsafe {
            cortex_m::peripheral::NVIC::unmask(pac::Interrupt::USART1);
            cortex_m::peripheral::NVIC::unmask(pac::Interrupt::TIM6_DAC);
        }

        loop {
            if heartbeat.tick() {
                heartbeat_led.toggle();
            }

            watchdog.feed();

            engine.poll(&mut usart);
            decoder.sample(PortSnapshot::encoder());
        }
    }

    #[interrupt]
    fn TIM6_DAC() {
        if hw::timer::clear_update() {
            critical_section::with(|cs| {
                if let Some(sampler) = SAMPLER.borrow_ref_mut(cs).as_mut() {
                    sampler.tick();
                }
            });
        }
    }

    #[interrupt]
    fn USART1() {
        hw::usart::on_interrupt(&LINK);
    }
}

// Host builds only exist to run the library tests.
#[cfg(not(target_os = "none"))]
fn main() {}
