//! Отложенные one-shot действия на игровом времени.
//!
//! Заменяет "корутины с таймером": действие ставится с задержкой, получает
//! `CancelToken`, может быть отменено до срабатывания. Токены монотонны и
//! никогда не переиспользуются.

/// Задержки сравниваются с этим допуском (накопленное f32 время от FixedUpdate)
const DUE_EPSILON: f64 = 1e-6;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CancelToken(u64);

#[derive(Debug, Clone)]
struct Scheduled<A> {
    token: CancelToken,
    due: f64,
    action: A,
}

/// Очередь отложенных действий (время в секундах с момента создания)
#[derive(Debug, Clone)]
pub struct Scheduler<A> {
    now: f64,
    next_token: u64,
    queue: Vec<Scheduled<A>>,
}

impl<A> Default for Scheduler<A> {
    fn default() -> Self {
        Self {
            now: 0.0,
            next_token: 0,
            queue: Vec::new(),
        }
    }
}

impl<A> Scheduler<A> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Текущее время очереди
    pub fn now(&self) -> f64 {
        self.now
    }

    pub fn pending_count(&self) -> usize {
        self.queue.len()
    }

    /// Ставит действие через `delay` секунд от текущего времени очереди.
    pub fn schedule(&mut self, delay: f32, action: A) -> CancelToken {
        let token = CancelToken(self.next_token);
        self.next_token += 1;

        self.queue.push(Scheduled {
            token,
            due: self.now + f64::from(delay.max(0.0)),
            action,
        });

        token
    }

    /// `true` если действие было в очереди (ещё не сработало)
    pub fn cancel(&mut self, token: CancelToken) -> bool {
        let before = self.queue.len();
        self.queue.retain(|entry| entry.token != token);
        self.queue.len() != before
    }

    pub fn is_pending(&self, token: CancelToken) -> bool {
        self.queue.iter().any(|entry| entry.token == token)
    }

    pub fn clear(&mut self) {
        self.queue.clear();
    }

    /// Продвигает время и возвращает созревшие действия.
    ///
    /// Порядок: по времени срабатывания, при равенстве по порядку постановки.
    pub fn advance(&mut self, delta_secs: f32) -> Vec<A> {
        self.now += f64::from(delta_secs.max(0.0));

        let now = self.now + DUE_EPSILON;
        let (mut due, pending): (Vec<_>, Vec<_>) =
            self.queue.drain(..).partition(|entry| entry.due <= now);
        self.queue = pending;

        due.sort_by(|a, b| a.due.total_cmp(&b.due).then(a.token.cmp(&b.token)));
        due.into_iter().map(|entry| entry.action).collect()
    }
}
