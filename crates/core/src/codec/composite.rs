//! Composite codec: an outer codec stacked on an inner one.
//!
//! `Composite<C1, C2>` decodes raw units with `C2` into intermediate units,
//! then decodes those with `C1`. The intermediate type is `C2::Char`, which
//! must equal `C1::Unit`. UTF-16BE, for instance, is UTF-16 stacked on a
//! big-endian 16-bit byte reader.
//!
//! Decoding gathers up to `C1::MAX_CODE_UNITS` intermediate units, recording
//! where each one ended in the raw input and the inner state after it. Once
//! `C1` reports how many intermediate units it used, that count is mapped
//! back to raw units and the inner state is committed at exactly that point,
//! so intermediate units that were looked at but not used are decoded again
//! by the next step.

use super::{BidirectionalCodec, Codec, Decoded, FixedWidthCodec, UnitBuf};
use crate::error::CodecError;
use crate::unit::UnitSink;
use smallvec::SmallVec;
use std::marker::PhantomData;
use tracing::debug;

/// Outer codec `C1` over inner codec `C2`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Composite<C1, C2> {
    _marker: PhantomData<fn() -> (C1, C2)>,
}

/// State transition addressed to one half of a composite.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompositeTransition<T1, T2> {
    Outer(T1),
    Inner(T2),
}

/// Intermediate units gathered for one outer step, with bookkeeping that
/// maps each back to the raw input.
struct Gathered<C1: Codec, C2: Codec> {
    inner: UnitBuf<C1::Unit>,
    /// Raw units spanned up to and including each intermediate unit
    spans: SmallVec<[usize; 8]>,
    /// Inner state after each intermediate unit
    states: SmallVec<[C2::State; 8]>,
    /// Raw units spanned by everything the inner codec looked at
    total: usize,
    /// Inner codec failure that stopped the gathering, with its raw span
    error: Option<(CodecError, usize)>,
}

impl<C1, C2> Composite<C1, C2>
where
    C1: Codec,
    C2: Codec<Char = C1::Unit>,
{
    fn new_gathered() -> Gathered<C1, C2> {
        Gathered {
            inner: SmallVec::new(),
            spans: SmallVec::new(),
            states: SmallVec::new(),
            total: 0,
            error: None,
        }
    }

    /// Turn the outer step over the gathered units into a raw step,
    /// committing both states.
    fn finish(
        state: &mut (C1::State, C2::State),
        gathered: Gathered<C1, C2>,
        outer_state: C1::State,
        inner_state: C2::State,
        step: Decoded<C1::Char>,
    ) -> Decoded<C1::Char> {
        let Gathered {
            inner,
            spans,
            mut states,
            total,
            error,
        } = gathered;

        if inner.is_empty() {
            state.1 = inner_state;
            return match error {
                Some((kind, span)) => Decoded::error(kind, span),
                None if total > 0 => Decoded::no_character(total),
                None => Decoded::underflow(0),
            };
        }

        if step.result == Err(CodecError::DecodeUnderflow) {
            // The outer codec wanted more than the inner codec could supply.
            // Blame the inner failure if there was one, otherwise the input
            // simply ended.
            state.0 = outer_state;
            state.1 = inner_state;
            return match error {
                Some((kind, span)) => Decoded::error(kind, span),
                None => Decoded::underflow(total),
            };
        }

        let used = step.consumed.clamp(1, inner.len());
        state.0 = outer_state;
        state.1 = states.swap_remove(used - 1);
        Decoded {
            consumed: spans[used - 1],
            result: step.result,
        }
    }
}

impl<C1, C2> Codec for Composite<C1, C2>
where
    C1: Codec,
    C2: Codec<Char = C1::Unit>,
{
    type Char = C1::Char;
    type Unit = C2::Unit;
    type State = (C1::State, C2::State);
    type Transition = CompositeTransition<C1::Transition, C2::Transition>;

    const MIN_CODE_UNITS: usize = C1::MIN_CODE_UNITS * C2::MIN_CODE_UNITS;
    const MAX_CODE_UNITS: usize = C1::MAX_CODE_UNITS * C2::MAX_CODE_UNITS;
    const STATELESS: bool = C1::STATELESS && C2::STATELESS;

    fn replacement() -> C1::Char {
        C1::replacement()
    }

    fn encode_state_transition<S: UnitSink<C2::Unit> + ?Sized>(
        state: &mut Self::State,
        transition: Self::Transition,
        out: &mut S,
    ) -> Result<(), CodecError> {
        match transition {
            CompositeTransition::Outer(t) => {
                let mut scratch: UnitBuf<C1::Unit> = SmallVec::new();
                C1::encode_state_transition(&mut state.0, t, &mut scratch)?;
                for unit in scratch {
                    C2::encode(&mut state.1, unit, out)?;
                }
                Ok(())
            }
            CompositeTransition::Inner(t) => C2::encode_state_transition(&mut state.1, t, out),
        }
    }

    fn encode<S: UnitSink<C2::Unit> + ?Sized>(
        state: &mut Self::State,
        ch: C1::Char,
        out: &mut S,
    ) -> Result<(), CodecError> {
        let mut scratch: UnitBuf<C1::Unit> = SmallVec::new();
        C1::encode(&mut state.0, ch, &mut scratch)?;

        for (i, unit) in scratch.iter().enumerate() {
            if let Err(err) = C2::encode(&mut state.1, *unit, out) {
                debug!(
                    "inner codec rejected unit {} of {}: {}",
                    i + 1,
                    scratch.len(),
                    err
                );
                return Err(err);
            }
        }
        Ok(())
    }

    fn decode(state: &mut Self::State, units: &[C2::Unit]) -> Decoded<C1::Char> {
        let mut gathered = Self::new_gathered();
        let mut inner_state = state.1.clone();

        while gathered.inner.len() < C1::MAX_CODE_UNITS && gathered.total < units.len() {
            let start = gathered.total;
            let end = units.len().min(start + C2::MAX_CODE_UNITS);
            let step = C2::decode(&mut inner_state, &units[start..end]);
            let span = start + step.consumed.clamp(1, end - start);

            match step.result {
                Ok(Some(unit)) => {
                    gathered.inner.push(unit);
                    gathered.spans.push(span);
                    gathered.states.push(inner_state.clone());
                    gathered.total = span;
                }
                Ok(None) => gathered.total = span,
                Err(kind) => {
                    gathered.error = Some((kind, span));
                    break;
                }
            }
        }

        let mut outer_state = state.0.clone();
        let step = if gathered.inner.is_empty() {
            Decoded::underflow(0)
        } else {
            C1::decode(&mut outer_state, &gathered.inner)
        };
        Self::finish(state, gathered, outer_state, inner_state, step)
    }
}

impl<C1, C2> BidirectionalCodec for Composite<C1, C2>
where
    C1: BidirectionalCodec,
    C2: BidirectionalCodec<Char = C1::Unit>,
{
    fn rdecode(state: &mut Self::State, units: &[C2::Unit]) -> Decoded<C1::Char> {
        let mut gathered = Self::new_gathered();
        let mut inner_state = state.1.clone();

        while gathered.inner.len() < C1::MAX_CODE_UNITS && gathered.total < units.len() {
            let end = units.len() - gathered.total;
            let start = end.saturating_sub(C2::MAX_CODE_UNITS);
            let step = C2::rdecode(&mut inner_state, &units[start..end]);
            let span = gathered.total + step.consumed.clamp(1, end - start);

            match step.result {
                Ok(Some(unit)) => {
                    gathered.inner.push(unit);
                    gathered.spans.push(span);
                    gathered.states.push(inner_state.clone());
                    gathered.total = span;
                }
                Ok(None) => gathered.total = span,
                Err(kind) => {
                    gathered.error = Some((kind, span));
                    break;
                }
            }
        }

        // Gathered last to first; the outer codec wants input order
        gathered.inner.reverse();

        let mut outer_state = state.0.clone();
        let step = if gathered.inner.is_empty() {
            Decoded::underflow(0)
        } else {
            C1::rdecode(&mut outer_state, &gathered.inner)
        };
        Self::finish(state, gathered, outer_state, inner_state, step)
    }
}

impl<C1, C2> FixedWidthCodec for Composite<C1, C2>
where
    C1: FixedWidthCodec,
    C2: FixedWidthCodec<Char = C1::Unit>,
{
}
