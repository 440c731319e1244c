use futures_util::future::BoxFuture;
use std::task::{Context, Poll};
use tower::{Service, ServiceExt};

trait CloneService<R>: Service<R> {
    fn clone_box(
        &self,
    ) -> Box<
        dyn CloneService<R, Response = Self::Response, Error = Self::Error, Future = Self::Future>
            + Send
            + Sync,
    >;
}

impl<R, S> CloneService<R> for S
where
    S: Service<R> + Clone + Send + Sync + 'static,
{
    fn clone_box(
        &self,
    ) -> Box<
        dyn CloneService<R, Response = S::Response, Error = S::Error, Future = S::Future>
            + Send
            + Sync,
    > {
        Box::new(self.clone())
    }
}

/// Like `tower`'s `BoxService`, except cloneable and `Sync`
///
/// The `Sync` part matters: the client is shared by reference across tasks.
pub struct BoxCloneService<T, U, E> {
    inner: Box<
        dyn CloneService<T, Response = U, Error = E, Future = BoxFuture<'static, Result<U, E>>>
            + Send
            + Sync,
    >,
}

impl<T, U, E> BoxCloneService<T, U, E>
where
    T: 'static,
    U: 'static,
    E: 'static,
{
    pub fn new<S>(service: S) -> Self
    where
        S: Service<T, Response = U, Error = E> + Clone + Send + Sync + 'static,
        S::Future: Send + 'static,
    {
        let service = service
            .map_future(|future| -> BoxFuture<'static, Result<U, E>> { Box::pin(future) });

        Self {
            inner: Box::new(service),
        }
    }
}

impl<T, U, E> Service<T> for BoxCloneService<T, U, E> {
    type Response = U;
    type Error = E;
    type Future = BoxFuture<'static, Result<U, E>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, req: T) -> Self::Future {
        self.inner.call(req)
    }
}

impl<T, U, E> Clone for BoxCloneService<T, U, E> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone_box(),
        }
    }
}
