//! FreeRTOS placement for `std` threads.
//!
//! ESP-IDF backs `std::thread` with pthreads, and pthreads with
//! FreeRTOS tasks.  Core affinity, FreeRTOS priority and stack size
//! cannot be passed through `std::thread::Builder`; instead
//! `esp_pthread_set_cfg()` stashes a template that the *next*
//! `pthread_create()` from the calling thread picks up.  [`TaskSpec`]
//! keeps that template write and the spawn paired on one thread, so
//! the config can never leak onto an unrelated spawn.

/// The two Xtensa LX7 cores of the ESP32-S3.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum Core {
    /// Core 0 (PRO_CPU).  Shares the core with the USB peripheral
    /// interrupt handling, so the serial I/O thread lives here.
    Pro = 0,
    /// Core 1 (APP_CPU).  Control loop and effect stepping.
    App = 1,
}

/// Placement for one firmware thread.
pub struct TaskSpec {
    pub core: Core,
    /// FreeRTOS priority (idle = 0, higher preempts lower).
    pub priority: u8,
    pub stack_kb: usize,
    /// FreeRTOS task name.  Must carry a trailing NUL, e.g. `"serial-io\0"`.
    pub name: &'static str,
}

impl TaskSpec {
    /// Spawn `f` on the configured core.
    ///
    /// On the host the core pinning and priority have no equivalent and
    /// only the stack size and thread name are honoured.
    #[cfg(target_os = "espidf")]
    pub fn spawn(self, f: impl FnOnce() + Send + 'static) -> std::thread::JoinHandle<()> {
        unsafe {
            let mut cfg = esp_idf_sys::esp_create_default_pthread_config();
            cfg.pin_to_core = self.core as i32;
            cfg.prio = self.priority as i32;
            cfg.stack_size = (self.stack_kb * 1024) as i32;
            cfg.thread_name = self.name.as_ptr() as *const _;
            let err = esp_idf_sys::esp_pthread_set_cfg(&cfg);
            assert_eq!(
                err,
                esp_idf_sys::ESP_OK as i32,
                "esp_pthread_set_cfg rejected the task template: {err}"
            );
        }

        let label = self.name.trim_end_matches('\0');
        log::info!(
            "TASK | '{label}' on {:?} (prio {}, {}KB stack)",
            self.core,
            self.priority,
            self.stack_kb
        );

        std::thread::Builder::new()
            .name(label.into())
            .spawn(f)
            .expect("task spawn failed")
    }

    #[cfg(not(target_os = "espidf"))]
    pub fn spawn(self, f: impl FnOnce() + Send + 'static) -> std::thread::JoinHandle<()> {
        let label = self.name.trim_end_matches('\0');
        log::info!("TASK | '{label}' ({}KB stack, host, no pinning)", self.stack_kb);

        std::thread::Builder::new()
            .name(label.into())
            .stack_size(self.stack_kb * 1024)
            .spawn(f)
            .expect("task spawn failed")
    }
}
