use crate::events::Rectangle;
use crate::services::bounds_store::BoundsStore;
use crate::debug_if_enabled;
use parking_lot::Mutex;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tokio::time::{sleep, Duration};
use tracing::{info, warn};

/// Отложенная запись: последний прямоугольник и таймер, который его сохранит
#[derive(Default)]
struct PendingWrite {
    timer: Option<JoinHandle<()>>,
    bounds: Option<Rectangle>,
    // Номер поколения, чтобы сработавший таймер не стёр более новую запись
    generation: u64,
}

/// Склеивает частые изменения размеров окна в одну запись в хранилище.
///
/// В любой момент жив не более чем один таймер: новое значение заменяет
/// ожидающее и перезапускает задержку.
pub struct DebouncedPersister {
    store: Arc<dyn BoundsStore>,
    delay: Duration,
    current: Mutex<Option<Rectangle>>,
    pending: Arc<Mutex<PendingWrite>>,
    // Удерживается на всё время записи в хранилище
    commit_lock: Arc<tokio::sync::Mutex<()>>,
}

impl DebouncedPersister {
    pub fn new(store: Arc<dyn BoundsStore>, delay: Duration) -> Self {
        info!("Инициализация DebouncedPersister (задержка {}мс)", delay.as_millis());
        Self {
            store,
            delay,
            current: Mutex::new(None),
            pending: Arc::new(Mutex::new(PendingWrite::default())),
            commit_lock: Arc::new(tokio::sync::Mutex::new(())),
        }
    }

    /// Последние известные размеры окна (могут быть ещё не записаны)
    pub fn current(&self) -> Option<Rectangle> {
        *self.current.lock()
    }

    /// Есть ли ожидающая запись
    pub fn has_pending(&self) -> bool {
        self.pending.lock().timer.is_some()
    }

    /// Запомнить размеры и (пере)запустить таймер записи
    pub fn schedule(&self, bounds: Rectangle) {
        *self.current.lock() = Some(bounds);

        let mut pending = self.pending.lock();
        if let Some(timer) = pending.timer.take() {
            timer.abort();
            debug_if_enabled!("Предыдущая отложенная запись отменена");
        }

        pending.generation += 1;
        pending.bounds = Some(bounds);

        let generation = pending.generation;
        let store = Arc::clone(&self.store);
        let slot = Arc::clone(&self.pending);
        let commit_lock = Arc::clone(&self.commit_lock);
        let delay = self.delay;

        pending.timer = Some(tokio::spawn(async move {
            sleep(delay).await;
            let _commit = commit_lock.lock().await;

            // После этой точки задачу уже никто не отменяет: дескриптор убран
            let bounds = {
                let mut pending = slot.lock();
                if pending.generation != generation {
                    return;
                }
                pending.timer = None;
                pending.bounds.take()
            };

            if let Some(bounds) = bounds {
                Self::commit(store.as_ref(), bounds).await;
            }
        }));

        debug_if_enabled!("Запись {} запланирована через {}мс", bounds, delay.as_millis());
    }

    /// Немедленно записать ожидающее значение (при завершении работы).
    /// Запись, которая уже идёт, дожидается завершения.
    pub async fn flush(&self) {
        let bounds = {
            let mut pending = self.pending.lock();
            if let Some(timer) = pending.timer.take() {
                timer.abort();
            }
            pending.generation += 1;
            pending.bounds.take()
        };

        let _commit = self.commit_lock.lock().await;

        match bounds {
            Some(bounds) => {
                info!("Сохранение ожидающих размеров окна перед выходом");
                Self::commit(self.store.as_ref(), bounds).await;
            }
            None => debug_if_enabled!("Нет ожидающих записей"),
        }
    }

    async fn commit(store: &dyn BoundsStore, bounds: Rectangle) {
        // Без повторов: следующее изменение размеров само попробует снова
        match store.set(bounds).await {
            Ok(()) => info!("Размеры окна сохранены: {}", bounds),
            Err(e) => warn!("Не удалось сохранить размеры окна {}: {}", bounds, e),
        }
    }
}

impl Drop for DebouncedPersister {
    fn drop(&mut self) {
        if let Some(timer) = self.pending.lock().timer.take() {
            timer.abort();
        }
    }
}
