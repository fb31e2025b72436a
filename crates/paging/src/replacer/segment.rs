use crate::typedef::FrameId;

/// Which recency list a record belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Segment {
    Cold,
    Hot,
}

#[derive(Clone, Copy, Debug, Default)]
struct Link {
    prev: Option<FrameId>,
    next: Option<FrameId>,
    segment: Option<Segment>,
}

#[derive(Clone, Copy, Debug, Default)]
struct Ends {
    head: Option<FrameId>,
    tail: Option<FrameId>,
    len: usize,
}

/// Cold and hot recency lists threaded through an arena of links indexed by
/// frame id. Head is most recently used, tail least. A frame is on at most
/// one list.
#[derive(Debug)]
pub(crate) struct Segmentation {
    links: Vec<Link>,
    cold: Ends,
    hot: Ends,
}

impl Segmentation {
    pub(crate) fn new(capacity: usize) -> Self {
        Self {
            links: vec![Link::default(); capacity],
            cold: Ends::default(),
            hot: Ends::default(),
        }
    }

    fn ends(&self, segment: Segment) -> &Ends {
        match segment {
            Segment::Cold => &self.cold,
            Segment::Hot => &self.hot,
        }
    }

    fn ends_mut(&mut self, segment: Segment) -> &mut Ends {
        match segment {
            Segment::Cold => &mut self.cold,
            Segment::Hot => &mut self.hot,
        }
    }

    pub(crate) fn segment_of(&self, frame_id: FrameId) -> Option<Segment> {
        self.links.get(frame_id).and_then(|link| link.segment)
    }

    pub(crate) fn len(&self, segment: Segment) -> usize {
        self.ends(segment).len
    }

    pub(crate) fn tail(&self, segment: Segment) -> Option<FrameId> {
        self.ends(segment).tail
    }

    /// Detaches `frame_id` from whichever list holds it.
    pub(crate) fn unlink(&mut self, frame_id: FrameId) -> Option<Segment> {
        let link = self.links[frame_id];
        let segment = link.segment?;

        match link.prev {
            Some(prev) => self.links[prev].next = link.next,
            None => self.ends_mut(segment).head = link.next,
        }
        match link.next {
            Some(next) => self.links[next].prev = link.prev,
            None => self.ends_mut(segment).tail = link.prev,
        }
        self.ends_mut(segment).len -= 1;
        self.links[frame_id] = Link::default();
        Some(segment)
    }

    fn push_front(&mut self, frame_id: FrameId, segment: Segment) {
        let head = self.ends(segment).head;
        self.links[frame_id] = Link {
            prev: None,
            next: head,
            segment: Some(segment),
        };
        match head {
            Some(head) => self.links[head].prev = Some(frame_id),
            None => self.ends_mut(segment).tail = Some(frame_id),
        }
        let ends = self.ends_mut(segment);
        ends.head = Some(frame_id);
        ends.len += 1;
    }

    /// Moves `frame_id` to the front of `segment`, unlinking it first.
    pub(crate) fn promote(&mut self, frame_id: FrameId, segment: Segment) {
        self.unlink(frame_id);
        self.push_front(frame_id, segment);
    }

    /// Frames of `segment` from most to least recently used.
    pub(crate) fn iter(&self, segment: Segment) -> Iter<'_> {
        Iter {
            links: &self.links,
            cursor: self.ends(segment).head,
            forward: true,
        }
    }

    /// Frames of `segment` from least to most recently used.
    pub(crate) fn iter_from_tail(&self, segment: Segment) -> Iter<'_> {
        Iter {
            links: &self.links,
            cursor: self.ends(segment).tail,
            forward: false,
        }
    }
}

pub(crate) struct Iter<'a> {
    links: &'a [Link],
    cursor: Option<FrameId>,
    forward: bool,
}

impl Iterator for Iter<'_> {
    type Item = FrameId;

    fn next(&mut self) -> Option<FrameId> {
        let frame_id = self.cursor?;
        let link = &self.links[frame_id];
        self.cursor = if self.forward { link.next } else { link.prev };
        Some(frame_id)
    }
}
